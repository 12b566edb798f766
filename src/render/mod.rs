//! Rendering module for converting documents to output formats.

mod json;
mod options;
mod result;
mod rtf;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, INCH, LETTER_HEIGHT, LETTER_WIDTH};
pub use result::{DocumentStats, RenderResult};
pub use rtf::{escape, to_rtf, to_rtf_with_stats, RtfRenderer, BULLET_MARKER, RTF_HEADER};
pub use text::to_text;
