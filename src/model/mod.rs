//! Document model types for rich-text content.
//!
//! This module defines the intermediate representation shared by the markup
//! parser, the RTF parser, and the renderers. Every value is built once per
//! conversion and never shared between requests.

mod block;
mod document;
mod run;
mod style;
mod table;

pub use block::{Alignment, Block, ParagraphStyle};
pub use document::{Document, Metadata};
pub use run::{Span, StyledRun};
pub use style::{Color, FontFace, FontFamily, Style, StyleOverride};
pub use table::{Border, Table, TableCell, TableRow};
