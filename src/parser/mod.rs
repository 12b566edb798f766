//! Parsing module: markup to document, and RTF back to document.

mod inline;
mod lexer;
mod markup;
mod options;
mod rtf;
mod table;

pub use inline::InlineFormatter;
pub use lexer::{tokenize, Token};
pub use markup::MarkupParser;
pub use options::ParseOptions;
pub use rtf::RtfParser;
pub use table::{is_separator, is_table_line, split_cells, TableBuilder, TableConfig};
