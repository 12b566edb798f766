//! Block-level types.

use super::{StyledRun, Table};
use serde::{Deserialize, Serialize};

/// Paragraph styling properties, fixed when the block is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Alignment,

    /// Space before the paragraph in points
    pub space_before: f32,

    /// Space after the paragraph in points
    pub space_after: f32,

    /// Indent of every line but the first, in points
    pub head_indent: f32,

    /// Indent of the first line, in points
    pub first_line_head_indent: f32,

    /// Left-aligned tab stops in points
    pub tab_stops: Vec<f32>,

    /// Line spacing multiplier (1.0 = single)
    pub line_spacing: f32,

    /// Outline level for headings (1-4)
    pub outline_level: Option<u8>,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 0.0,
            head_indent: 0.0,
            first_line_head_indent: 0.0,
            tab_stops: Vec::new(),
            line_spacing: 1.0,
            outline_level: None,
        }
    }
}

impl ParagraphStyle {
    /// Create a paragraph style with the given line spacing.
    pub fn with_line_spacing(line_spacing: f32) -> Self {
        Self {
            line_spacing,
            ..Default::default()
        }
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set paragraph spacing and return self.
    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    /// Hanging indent with a tab stop at the indent, as used by list items.
    pub fn hanging(mut self, indent: f32) -> Self {
        self.head_indent = indent;
        self.first_line_head_indent = 0.0;
        self.tab_stops = vec![indent];
        self
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// One structural unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading (level 1-4)
    Heading {
        level: u8,
        style: ParagraphStyle,
        run: StyledRun,
    },

    /// A bulleted list item
    BulletItem { style: ParagraphStyle, run: StyledRun },

    /// A numbered list item; `label` is the literal index from the source
    NumberedItem {
        label: String,
        style: ParagraphStyle,
        run: StyledRun,
    },

    /// A table
    Table(Table),

    /// A plain paragraph (possibly empty)
    Paragraph { style: ParagraphStyle, run: StyledRun },
}

impl Block {
    /// Text run of a non-table block.
    pub fn run(&self) -> Option<&StyledRun> {
        match self {
            Block::Heading { run, .. }
            | Block::BulletItem { run, .. }
            | Block::NumberedItem { run, .. }
            | Block::Paragraph { run, .. } => Some(run),
            Block::Table(_) => None,
        }
    }

    /// Mutable text run of a non-table block.
    pub fn run_mut(&mut self) -> Option<&mut StyledRun> {
        match self {
            Block::Heading { run, .. }
            | Block::BulletItem { run, .. }
            | Block::NumberedItem { run, .. }
            | Block::Paragraph { run, .. } => Some(run),
            Block::Table(_) => None,
        }
    }

    /// Paragraph style of a non-table block.
    pub fn paragraph_style(&self) -> Option<&ParagraphStyle> {
        match self {
            Block::Heading { style, .. }
            | Block::BulletItem { style, .. }
            | Block::NumberedItem { style, .. }
            | Block::Paragraph { style, .. } => Some(style),
            Block::Table(_) => None,
        }
    }

    /// Numeric value of a numbered item's label.
    pub fn index(&self) -> Option<u64> {
        match self {
            Block::NumberedItem { label, .. } => label.parse().ok(),
            _ => None,
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Table(table) => table.plain_text(),
            other => other.run().map(StyledRun::plain_text).unwrap_or_default(),
        }
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Short name of the block kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::BulletItem { .. } => "bullet_item",
            Block::NumberedItem { .. } => "numbered_item",
            Block::Table(_) => "table",
            Block::Paragraph { .. } => "paragraph",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Style;

    #[test]
    fn test_hanging_indent() {
        let style = ParagraphStyle::default().hanging(20.0);
        assert_eq!(style.head_indent, 20.0);
        assert_eq!(style.first_line_head_indent, 0.0);
        assert_eq!(style.tab_stops, vec![20.0]);
    }

    #[test]
    fn test_block_accessors() {
        let block = Block::NumberedItem {
            label: "12".to_string(),
            style: ParagraphStyle::default(),
            run: StyledRun::plain("Step", Style::default()),
        };
        assert_eq!(block.index(), Some(12));
        assert_eq!(block.plain_text(), "Step");
        assert_eq!(block.kind(), "numbered_item");
        assert!(!block.is_table());
        assert!(block.run().is_some());
    }
}
