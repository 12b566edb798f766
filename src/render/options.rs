//! Rendering options and configuration.

use chrono::{DateTime, Utc};

/// US Letter width in twips.
pub const LETTER_WIDTH: u32 = 12240;
/// US Letter height in twips.
pub const LETTER_HEIGHT: u32 = 15840;
/// One inch in twips.
pub const INCH: u32 = 1440;

/// Options for rendering documents to RTF.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page width in twips
    pub paper_width: u32,

    /// Page height in twips
    pub paper_height: u32,

    /// Left margin in twips
    pub margin_left: u32,

    /// Right margin in twips
    pub margin_right: u32,

    /// Top margin in twips
    pub margin_top: u32,

    /// Bottom margin in twips
    pub margin_bottom: u32,

    /// Write the `{\info}` group (title, author, creation time)
    pub include_info: bool,

    /// Cell padding in points, overriding the value stored on each cell
    pub table_padding: Option<f32>,

    /// Cell border width in twips, overriding the value stored on each cell
    pub table_border_width: Option<u16>,

    /// Fixed column width in twips (default: text width / column count)
    pub column_width: Option<u32>,

    /// Creation time written when the document carries none
    pub creation_time: Option<DateTime<Utc>>,

    /// Collect document statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in twips.
    pub fn with_paper_size(mut self, width: u32, height: u32) -> Self {
        self.paper_width = width;
        self.paper_height = height;
        self
    }

    /// Set all four margins in twips.
    pub fn with_margins(mut self, margin: u32) -> Self {
        self.margin_left = margin;
        self.margin_right = margin;
        self.margin_top = margin;
        self.margin_bottom = margin;
        self
    }

    /// Enable or disable the info group.
    pub fn with_info(mut self, include: bool) -> Self {
        self.include_info = include;
        self
    }

    /// Override table cell padding (points).
    pub fn with_table_padding(mut self, padding: f32) -> Self {
        self.table_padding = Some(padding);
        self
    }

    /// Override table border width (twips).
    pub fn with_table_border_width(mut self, width: u16) -> Self {
        self.table_border_width = Some(width);
        self
    }

    /// Use a fixed column width (twips).
    pub fn with_column_width(mut self, width: u32) -> Self {
        self.column_width = Some(width);
        self
    }

    /// Set the creation time used when the document has none.
    pub fn with_creation_time(mut self, time: DateTime<Utc>) -> Self {
        self.creation_time = Some(time);
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self) -> Self {
        self.collect_stats = true;
        self
    }

    /// Width available for text between the margins, in twips.
    pub fn text_width(&self) -> u32 {
        self.paper_width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }

    /// Width of one table column in twips.
    pub fn column_width_for(&self, columns: usize) -> u32 {
        match self.column_width {
            Some(width) => width,
            None => self.text_width() / columns.max(1) as u32,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            paper_width: LETTER_WIDTH,
            paper_height: LETTER_HEIGHT,
            margin_left: INCH,
            margin_right: INCH,
            margin_top: INCH,
            margin_bottom: INCH,
            include_info: true,
            table_padding: None,
            table_border_width: None,
            column_width: None,
            creation_time: None,
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let options = RenderOptions::default();
        assert_eq!(options.paper_width, 12240);
        assert_eq!(options.text_width(), 9360);
        assert_eq!(options.column_width_for(2), 4680);
        assert!(options.include_info);
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_margins(720)
            .with_column_width(2000)
            .with_table_padding(2.0)
            .with_info(false)
            .with_stats();

        assert_eq!(options.margin_top, 720);
        assert_eq!(options.column_width_for(7), 2000);
        assert_eq!(options.table_padding, Some(2.0));
        assert!(!options.include_info);
        assert!(options.collect_stats);
    }
}
