//! RTF format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// RTF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtfFormat {
    /// Declared RTF major version (always 1 for current writers)
    pub version: u32,
    /// Whether a UTF-8 byte order mark preceded the header
    pub has_bom: bool,
}

impl std::fmt::Display for RtfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RTF {}", self.version)
    }
}

/// RTF magic bytes: {\rtf
const RTF_MAGIC: &[u8] = b"{\\rtf";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const HEADER_LEN: usize = 16;

/// Detect RTF format from a file path.
///
/// # Example
/// ```no_run
/// use rtfmark::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("notes.rtf").unwrap();
/// println!("RTF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<RtfFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file).take(HEADER_LEN as u64);
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect RTF format from bytes.
///
/// Only the first few bytes are inspected; the rest of the slice is ignored.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<RtfFormat> {
    let (data, has_bom) = match data.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, true),
        None => (data, false),
    };

    if !data.starts_with(RTF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let digits: String = data[RTF_MAGIC.len()..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();

    if digits.is_empty() {
        return Err(Error::UnknownFormat);
    }

    let version: u32 = digits
        .parse()
        .map_err(|_| Error::UnsupportedVersion(digits.clone()))?;
    if version != 1 {
        return Err(Error::UnsupportedVersion(digits));
    }

    Ok(RtfFormat { version, has_bom })
}

/// Check if a file is an RTF document.
pub fn is_rtf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with an RTF header.
pub fn is_rtf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
