//! Range-based formatting edits on existing RTF files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Color, Document, StyleOverride};
use crate::parser::RtfParser;
use crate::render::{to_rtf, RenderOptions};

use super::create::expand_path;

/// Kind of formatting edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Background color (yellow unless a color is given)
    Highlight,
    /// Text color (color required)
    Color,
    /// Bold weight
    Bold,
    /// Italic slant
    Italic,
}

/// One formatting edit over `[start, start + length)` of the document text.
///
/// Offsets are bytes into [`Document::text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOperation {
    /// What to apply
    #[serde(rename = "type")]
    pub kind: OperationType,

    /// Start offset in bytes
    pub start: usize,

    /// Length in bytes
    pub length: usize,

    /// Color name or hex triple for highlight and color edits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FormatOperation {
    /// Create an operation without a color.
    pub fn new(kind: OperationType, start: usize, length: usize) -> Self {
        Self {
            kind,
            start,
            length,
            color: None,
        }
    }

    /// Set the color and return self.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Style change this operation applies.
    pub fn style_override(&self) -> Result<StyleOverride> {
        let color = match self.color.as_deref() {
            Some(name) => Some(
                Color::parse(name)
                    .ok_or_else(|| Error::InvalidOperation(format!("unknown color '{}'", name)))?,
            ),
            None => None,
        };

        Ok(match self.kind {
            OperationType::Highlight => {
                StyleOverride::new().background(color.unwrap_or(Color::YELLOW))
            }
            OperationType::Color => {
                let color = color.ok_or_else(|| {
                    Error::InvalidOperation("color operation needs a color".to_string())
                })?;
                StyleOverride::new().foreground(color)
            }
            OperationType::Bold => StyleOverride::new().bold(),
            OperationType::Italic => StyleOverride::new().italic(),
        })
    }

    /// Apply this operation to a document.
    pub fn apply(&self, doc: &mut Document) -> Result<()> {
        let over = self.style_override()?;
        doc.apply_style(self.start, self.length, &over)
    }
}

/// Operation that was not applied, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedOperation {
    /// Position in the submitted list
    pub index: usize,

    /// Why it was skipped
    pub reason: String,
}

/// Outcome of applying a list of operations to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditReport {
    /// Number of operations applied
    pub applied: usize,

    /// Operations that were skipped
    pub skipped: Vec<SkippedOperation>,
}

/// Apply `operations` to `doc` in order. Invalid operations are skipped and
/// recorded; they never stop the batch.
pub fn apply_operations(doc: &mut Document, operations: &[FormatOperation]) -> EditReport {
    let mut report = EditReport::default();
    for (index, op) in operations.iter().enumerate() {
        match op.apply(doc) {
            Ok(()) => report.applied += 1,
            Err(e) => {
                log::warn!("Skipping formatting operation {}: {}", index, e);
                report.skipped.push(SkippedOperation {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}

/// Outcome of [`apply_formatting`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatResult {
    /// Whether the file was read and rewritten
    pub success: bool,

    /// Human-readable outcome
    pub message: String,

    /// Number of operations applied
    pub applied: usize,

    /// Number of operations skipped
    pub skipped: usize,
}

impl FormatResult {
    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            applied: 0,
            skipped: 0,
        }
    }
}

/// Apply formatting operations to the RTF file at `file_path` and rewrite it.
///
/// The file is read, parsed, edited and written back wholesale. Skipped
/// operations are listed in the message; only I/O and parse failures make
/// the result unsuccessful.
pub fn apply_formatting(file_path: &str, operations: &[FormatOperation]) -> FormatResult {
    let path = expand_path(file_path);

    let mut doc = match load(&path) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Could not load '{}': {}", path.display(), e);
            return FormatResult::failed(format!("Failed to read document: {}", e));
        }
    };

    let report = apply_operations(&mut doc, operations);

    if let Err(e) = save(&path, &doc) {
        log::warn!("Could not save '{}': {}", path.display(), e);
        return FormatResult::failed(format!("Failed to write file: {}", e));
    }

    let mut message = format!(
        "Applied {} of {} formatting operations",
        report.applied,
        operations.len()
    );
    for skipped in &report.skipped {
        message.push_str(&format!("; skipped #{}: {}", skipped.index, skipped.reason));
    }
    log::info!("{} to {}", message, path.display());

    FormatResult {
        success: true,
        message,
        applied: report.applied,
        skipped: report.skipped.len(),
    }
}

fn load(path: &Path) -> Result<Document> {
    RtfParser::open(path)?.parse()
}

fn save(path: &Path, doc: &Document) -> Result<()> {
    let rtf = to_rtf(doc, &RenderOptions::default())?;
    fs::write(path, rtf)?;
    Ok(())
}
