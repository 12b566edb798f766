//! Error types for rtfmark library.

use std::io;
use thiserror::Error;

/// Result type alias for rtfmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion and editing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as an RTF document.
    #[error("Unknown file format: not a valid RTF document")]
    UnknownFormat,

    /// The RTF major version is not supported.
    #[error("Unsupported RTF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing RTF structure.
    #[error("RTF parsing error: {0}")]
    RtfParse(String),

    /// The document model cannot be serialized.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A formatting range lies outside the document text.
    #[error("Range {start}+{length} is out of bounds (document text has {len} bytes)")]
    InvalidRange {
        /// Start offset in bytes
        start: usize,
        /// Length in bytes
        length: usize,
        /// Document text length in bytes
        len: usize,
    },

    /// A formatting operation is missing data it requires.
    #[error("Invalid formatting operation: {0}")]
    InvalidOperation(String),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: not a valid RTF document"
        );

        let err = Error::InvalidRange {
            start: 10,
            length: 5,
            len: 12,
        };
        assert_eq!(
            err.to_string(),
            "Range 10+5 is out of bounds (document text has 12 bytes)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
