//! Pipe table recognition and layout.

use super::InlineFormatter;
use crate::model::{Border, Color, Table, TableCell, TableRow};
use crate::template::TemplateStyle;

/// Table styling applied to every built table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Shading behind header cells
    pub header_shading: Color,

    /// Border drawn around every cell
    pub border: Border,

    /// Inner cell padding in points
    pub padding: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_shading: Color::HEADER_TINT,
            border: Border::HAIRLINE,
            padding: TableCell::DEFAULT_PADDING,
        }
    }
}

/// Check if a line belongs to a table (first non-blank char is `|`).
pub fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Check if a line is a header separator such as `|---|:--:|`.
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Split a table line into trimmed cell texts. Outer pipes are optional.
pub fn split_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

/// Builds [`Table`] blocks from raw table lines.
pub struct TableBuilder<'a> {
    formatter: &'a InlineFormatter,
    style: &'a TemplateStyle,
    config: TableConfig,
}

impl<'a> TableBuilder<'a> {
    /// Create a builder using the given formatter and template style.
    pub fn new(formatter: &'a InlineFormatter, style: &'a TemplateStyle) -> Self {
        Self {
            formatter,
            style,
            config: TableConfig::default(),
        }
    }

    /// Replace the table styling.
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a table from its header line and data lines (separator excluded).
    ///
    /// The header decides the column count; longer data rows are truncated,
    /// shorter ones keep only the cells they have.
    pub fn build(&self, header: &str, rows: &[&str]) -> Table {
        let header_cells = split_cells(header);
        let mut table = Table::new(header_cells.len());

        let cells = header_cells
            .iter()
            .map(|text| self.cell(text, true))
            .collect();
        table.add_row(TableRow::header(cells));

        for line in rows {
            let cells = split_cells(line)
                .iter()
                .map(|text| self.cell(text, false))
                .collect();
            table.add_row(TableRow::new(cells));
        }

        log::debug!(
            "Built table: {} columns, {} rows",
            table.column_count(),
            table.row_count()
        );
        table
    }

    fn cell(&self, text: &str, is_header: bool) -> TableCell {
        let run = self.formatter.format(text, &self.style.table_cell(is_header));
        TableCell {
            text: run,
            is_header,
            shading: is_header.then_some(self.config.header_shading),
            border: self.config.border,
            padding: self.config.padding,
        }
    }
}
