//! Rendering result with metadata and statistics.

use crate::model::{Block, Metadata};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (RTF, text, etc.)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Document statistics
    pub stats: DocumentStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: DocumentStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            metadata: Metadata::default(),
            stats: DocumentStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while rendering a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of headings
    pub heading_count: u32,

    /// Number of plain paragraphs (including empty ones)
    pub paragraph_count: u32,

    /// Number of bullet and numbered items
    pub list_item_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of table cells
    pub cell_count: u32,

    /// Number of styled spans
    pub span_count: u32,

    /// Number of hyperlinks
    pub link_count: u32,

    /// Font table entries written
    pub font_count: u32,

    /// Color table entries written (excluding the auto color)
    pub color_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a block tree, without rendering it.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut stats = Self::new();
        for block in blocks {
            stats.add_block(block);
        }
        stats
    }

    /// Count one block and its text.
    pub fn add_block(&mut self, block: &Block) {
        match block {
            Block::Heading { .. } => self.heading_count += 1,
            Block::BulletItem { .. } | Block::NumberedItem { .. } => self.list_item_count += 1,
            Block::Paragraph { .. } => self.paragraph_count += 1,
            Block::Table(table) => {
                self.table_count += 1;
                for row in &table.rows {
                    for cell in &row.cells {
                        self.cell_count += 1;
                        self.count_spans(cell.text.spans());
                    }
                }
            }
        }
        if let Some(run) = block.run() {
            self.count_spans(run.spans());
        }
    }

    fn count_spans(&mut self, spans: &[crate::model::Span]) {
        for span in spans {
            self.span_count += 1;
            if span.style.link.is_some() {
                self.link_count += 1;
            }
            self.count_text(&span.text);
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &DocumentStats) {
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.list_item_count += other.list_item_count;
        self.table_count += other.table_count;
        self.cell_count += other.cell_count;
        self.span_count += other.span_count;
        self.link_count += other.link_count;
        self.font_count += other.font_count;
        self.color_count += other.color_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
