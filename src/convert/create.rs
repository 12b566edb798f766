//! Document creation: markup in, RTF file out.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::MarkupParser;
use crate::render::to_rtf;

use super::ConvertOptions;

/// Outcome of [`create_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResult {
    /// Whether the file was written
    pub success: bool,

    /// Expanded path of the written file (empty on failure)
    pub path: String,

    /// Human-readable outcome
    pub message: String,
}

impl CreateResult {
    fn ok(path: &Path) -> Self {
        Self {
            success: true,
            path: path.display().to_string(),
            message: "Document created successfully".to_string(),
        }
    }

    fn failed(error: &Error) -> Self {
        let message = match error {
            Error::Render(_) => format!("Failed to create RTF data: {}", error),
            _ => format!("Failed to write file: {}", error),
        };
        Self {
            success: false,
            path: String::new(),
            message,
        }
    }
}

/// Convert `markup` with the named template and write it to `output_path`.
///
/// Unknown template names fall back to the business template. Failures are
/// reported in the result, never returned as errors.
///
/// # Example
/// ```no_run
/// use rtfmark::create_document;
///
/// let result = create_document("# Minutes\n- **Budget** approved", "~/minutes.rtf", "meeting");
/// assert!(result.success, "{}", result.message);
/// ```
pub fn create_document(markup: &str, output_path: &str, template: &str) -> CreateResult {
    let options = ConvertOptions::new().with_template_name(template);
    create_document_with_options(markup, output_path, &options)
}

/// Convert `markup` with explicit options and write it to `output_path`.
pub fn create_document_with_options(
    markup: &str,
    output_path: &str,
    options: &ConvertOptions,
) -> CreateResult {
    match write_document(markup, output_path, options) {
        Ok(path) => {
            log::info!("Created {}", path.display());
            CreateResult::ok(&path)
        }
        Err(e) => {
            log::warn!("Could not create '{}': {}", output_path, e);
            CreateResult::failed(&e)
        }
    }
}

fn write_document(markup: &str, output_path: &str, options: &ConvertOptions) -> Result<PathBuf> {
    if output_path.trim().is_empty() {
        return Err(Error::InvalidOperation("output path is empty".to_string()));
    }
    let path = expand_path(output_path);

    let parser = MarkupParser::with_options(options.parse.clone());
    let mut doc = parser.parse(markup);
    if doc.metadata.created.is_none() {
        doc.metadata.created = Some(options.render.creation_time.unwrap_or_else(Utc::now));
    }
    let rtf = to_rtf(&doc, &options.render)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            log::debug!("Could not create {}: {}", parent.display(), e);
        }
    }
    fs::write(&path, rtf)?;
    Ok(path)
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
