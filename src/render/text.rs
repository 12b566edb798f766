//! Plain text rendering.

use crate::model::{Block, Document};

/// Convert a document to plain text.
///
/// One line per block; list items keep their marker, table rows are written
/// one per line with tab-separated cells.
pub fn to_text(doc: &Document) -> String {
    let lines: Vec<String> = doc
        .blocks
        .iter()
        .map(|block| match block {
            Block::BulletItem { run, .. } => format!("\u{2022} {}", run.plain_text()),
            Block::NumberedItem { label, run, .. } => format!("{}. {}", label, run.plain_text()),
            other => other.plain_text(),
        })
        .collect();
    lines.join("\n")
}
