//! Document-level types.

use super::{Block, StyleOverride, StyledRun};
use crate::error::{Error, Result};
use crate::template::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rich-text document: blocks in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Content blocks
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the end of the document.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every text container in order: one per non-table block, one per
    /// table cell (row-major).
    pub fn runs(&self) -> Vec<&StyledRun> {
        let mut runs = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Table(table) => {
                    for row in &table.rows {
                        runs.extend(row.cells.iter().map(|c| &c.text));
                    }
                }
                other => runs.extend(other.run()),
            }
        }
        runs
    }

    fn runs_mut(&mut self) -> Vec<&mut StyledRun> {
        let mut runs = Vec::new();
        for block in &mut self.blocks {
            match block {
                Block::Table(table) => {
                    for row in &mut table.rows {
                        runs.extend(row.cells.iter_mut().map(|c| &mut c.text));
                    }
                }
                other => runs.extend(other.run_mut()),
            }
        }
        runs
    }

    /// Addressable document text: every text container followed by `\n`.
    ///
    /// Offsets used by [`Document::apply_style`] index into this string.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for run in self.runs() {
            text.push_str(&run.plain_text());
            text.push('\n');
        }
        text
    }

    /// Length of [`Document::text`] in bytes.
    pub fn text_len(&self) -> usize {
        self.runs().iter().map(|r| r.len() + 1).sum()
    }

    /// Apply `over` to the bytes `[start, start + length)` of the document
    /// text. Separators between containers carry no style and are skipped.
    pub fn apply_style(&mut self, start: usize, length: usize, over: &StyleOverride) -> Result<()> {
        let text = self.text();
        let len = text.len();
        let end = start
            .checked_add(length)
            .filter(|&end| end <= len)
            .filter(|&end| text.is_char_boundary(start) && text.is_char_boundary(end))
            .ok_or(Error::InvalidRange { start, length, len })?;

        let mut offset = 0;
        for run in self.runs_mut() {
            let run_start = offset;
            let run_end = offset + run.len();
            offset = run_end + 1;

            let lo = start.max(run_start);
            let hi = end.min(run_end);
            if lo < hi {
                run.apply(lo - run_start..hi - run_start, over)?;
            }
            if offset >= end {
                break;
            }
        }
        Ok(())
    }

    /// Get plain text content of the entire document, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Template the document was generated with
    pub template: Option<Template>,
}

impl Metadata {
    /// Check if there is anything worth writing to an info group.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.created.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, ParagraphStyle, Span, Style, Table, TableCell, TableRow};

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            style: ParagraphStyle::default(),
            run: StyledRun::plain(text, Style::default()),
        }
    }

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_block(paragraph("Hello"));
        let mut table = Table::new(2);
        table.add_row(TableRow::header(vec![
            TableCell::new(StyledRun::plain("A", Style::default())),
            TableCell::new(StyledRun::plain("B", Style::default())),
        ]));
        doc.add_block(Block::Table(table));
        doc.add_block(paragraph("world"));
        doc
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.text_len(), 0);
    }

    #[test]
    fn test_text_layout() {
        let doc = sample();
        assert_eq!(doc.text(), "Hello\nA\nB\nworld\n");
        assert_eq!(doc.text_len(), 16);
        assert_eq!(doc.plain_text(), "Hello\nA\tB\nworld");
    }

    #[test]
    fn test_apply_style_across_blocks() {
        let mut doc = sample();
        let over = StyleOverride::new().background(Color::GREEN);
        doc.apply_style(3, 6, &over).unwrap();

        let runs = doc.runs();
        let first: Vec<&Span> = runs[0].spans().iter().collect();
        assert_eq!(first[0].text, "Hel");
        assert_eq!(first[1].text, "lo");
        assert_eq!(first[1].style.background, Some(Color::GREEN));
        assert_eq!(runs[1].spans()[0].style.background, Some(Color::GREEN));
        assert_eq!(runs[2].spans()[0].style.background, Some(Color::GREEN));
        assert_eq!(runs[3].spans()[0].style.background, None);
        assert_eq!(doc.text(), "Hello\nA\nB\nworld\n");
    }

    #[test]
    fn test_apply_style_range_checks() {
        let mut doc = sample();
        let over = StyleOverride::new().bold();
        let len = doc.text_len();

        assert!(doc.apply_style(0, len - 1, &over).is_ok());
        assert!(doc.apply_style(0, len, &over).is_ok());
        assert!(matches!(
            doc.apply_style(0, len + 1, &over),
            Err(Error::InvalidRange { .. })
        ));
        assert!(doc.apply_style(usize::MAX, 2, &over).is_err());
    }

    #[test]
    fn test_metadata_is_empty() {
        let mut metadata = Metadata::default();
        assert!(metadata.is_empty());
        metadata.title = Some("Notes".to_string());
        assert!(!metadata.is_empty());
    }
}
