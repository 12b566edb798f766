//! Table types.

use super::{Color, StyledRun};
use serde::{Deserialize, Serialize};

/// A table: a grid of rows sharing one column count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, header first
    pub rows: Vec<TableRow>,

    /// Number of columns (taken from the header row)
    pub column_count: usize,
}

impl Table {
    /// Create an empty table with a fixed column count.
    pub fn new(column_count: usize) -> Self {
        Self {
            rows: Vec::new(),
            column_count,
        }
    }

    /// Add a row, discarding cells beyond the column count.
    pub fn add_row(&mut self, mut row: TableRow) {
        if row.cells.len() > self.column_count {
            log::debug!(
                "Table: dropping {} cells beyond column count {}",
                row.cells.len() - self.column_count,
                self.column_count
            );
            row.cells.truncate(self.column_count);
        }
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row, if the first row is one.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first().filter(|r| r.is_header)
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[TableRow] {
        match self.header() {
            Some(_) => &self.rows[1..],
            None => &self.rows,
        }
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// Cell border, drawn on all four edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    /// Line width in twips
    pub width: u16,
}

impl Border {
    /// Thinnest single-line border.
    pub const HAIRLINE: Border = Border { width: 10 };
}

impl Default for Border {
    fn default() -> Self {
        Self::HAIRLINE
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub text: StyledRun,

    /// Whether the cell belongs to the header row
    pub is_header: bool,

    /// Background shading
    pub shading: Option<Color>,

    /// Border on all four edges
    pub border: Border,

    /// Inner padding in points
    pub padding: f32,
}

impl TableCell {
    /// Default inner padding in points.
    pub const DEFAULT_PADDING: f32 = 5.0;

    /// Create a body cell.
    pub fn new(text: StyledRun) -> Self {
        Self {
            text,
            is_header: false,
            shading: None,
            border: Border::default(),
            padding: Self::DEFAULT_PADDING,
        }
    }

    /// Create a header cell.
    pub fn header(text: StyledRun, shading: Color) -> Self {
        Self {
            is_header: true,
            shading: Some(shading),
            ..Self::new(text)
        }
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
