//! # rtfmark
//!
//! Convert lightweight markup to RTF documents, and re-format existing RTF
//! files by character range.
//!
//! Markup is a small Markdown dialect: headings, bullet and numbered lists,
//! pipe tables, emphasis, strikethrough, links, highlight markers and color
//! markers. Output is plain RTF 1.x readable by word processors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rtfmark::{create_document, apply_formatting, FormatOperation, OperationType};
//!
//! let result = create_document("# Minutes\n- **Budget** ==approved==", "~/minutes.rtf", "meeting");
//! assert!(result.success, "{}", result.message);
//!
//! let ops = [FormatOperation::new(OperationType::Highlight, 0, 7)];
//! let edited = apply_formatting("~/minutes.rtf", &ops);
//! println!("{}", edited.message);
//! ```
//!
//! ## Features
//!
//! - **Templates**: business, technical, meeting and custom looks
//! - **Inline markup**: bold, italic, strikethrough, links, highlights, colors
//! - **Tables**: pipe tables with shaded header rows
//! - **Range edits**: highlight, color, bold and italic over existing files
//! - **Parallel processing**: batch creation with Rayon

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod template;

// Re-export commonly used types
pub use convert::{
    apply_formatting, create_document, create_document_with_options, create_documents,
    ConvertOptions, CreateRequest, CreateResult, FormatOperation, FormatResult, OperationType,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_rtf, RtfFormat};
pub use error::{Error, Result};
pub use model::{
    Alignment, Block, Color, Document, Metadata, ParagraphStyle, Span, Style, StyleOverride,
    StyledRun, Table, TableCell, TableRow,
};
pub use parser::{MarkupParser, ParseOptions, RtfParser};
pub use render::{DocumentStats, JsonFormat, RenderOptions, RenderResult};
pub use template::Template;

use std::io::Read;
use std::path::Path;

/// Parse markup with the default (business) template.
///
/// # Example
///
/// ```
/// use rtfmark::parse_markup;
///
/// let doc = parse_markup("# Title\nBody text");
/// assert_eq!(doc.block_count(), 2);
/// ```
pub fn parse_markup(markup: &str) -> Document {
    MarkupParser::new().parse(markup)
}

/// Parse markup with custom options.
///
/// # Example
///
/// ```
/// use rtfmark::{parse_markup_with_options, ParseOptions, Template};
///
/// let options = ParseOptions::new().with_template(Template::Technical);
/// let doc = parse_markup_with_options("`fn main()`", options);
/// assert!(!doc.is_empty());
/// ```
pub fn parse_markup_with_options(markup: &str, options: ParseOptions) -> Document {
    MarkupParser::with_options(options).parse(markup)
}

/// Convert markup straight to an RTF string.
///
/// # Example
///
/// ```
/// use rtfmark::markup_to_rtf;
///
/// let rtf = markup_to_rtf("Hello **world**", "business").unwrap();
/// assert!(rtf.starts_with("{\\rtf1"));
/// ```
pub fn markup_to_rtf(markup: &str, template: &str) -> Result<String> {
    let options = ParseOptions::new().with_template_name(template);
    let doc = parse_markup_with_options(markup, options);
    render::to_rtf(&doc, &RenderOptions::default())
}

/// Parse an RTF string.
pub fn parse_rtf(rtf: &str) -> Result<Document> {
    RtfParser::from_text(rtf)?.parse()
}

/// Parse RTF from bytes.
pub fn parse_rtf_bytes(data: &[u8]) -> Result<Document> {
    RtfParser::from_bytes(data)?.parse()
}

/// Parse an RTF file.
///
/// # Example
///
/// ```no_run
/// use rtfmark::parse_rtf_file;
///
/// let doc = parse_rtf_file("notes.rtf").unwrap();
/// println!("Blocks: {}", doc.block_count());
/// ```
pub fn parse_rtf_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    RtfParser::open(path)?.parse()
}

/// Parse RTF from a reader.
pub fn parse_rtf_reader<R: Read>(reader: R) -> Result<Document> {
    RtfParser::from_reader(reader)?.parse()
}

/// Extract the editable text of an RTF file, the same text that formatting
/// offsets index into.
///
/// # Example
///
/// ```no_run
/// use rtfmark::extract_text;
///
/// let text = extract_text("notes.rtf").unwrap();
/// let start = text.find("budget").unwrap();
/// println!("'budget' starts at byte {}", start);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_rtf_file(path)?;
    Ok(doc.text())
}

/// Builder for converting markup with custom options.
///
/// # Example
///
/// ```
/// use rtfmark::{Rtfmark, Template};
///
/// let rtf = Rtfmark::new()
///     .with_template(Template::Meeting)
///     .with_title("Weekly sync")
///     .convert("# Agenda\n1. Budget")
///     .to_rtf()?;
/// assert!(rtf.contains("Weekly sync"));
/// # Ok::<(), rtfmark::Error>(())
/// ```
pub struct Rtfmark {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Rtfmark {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Set the template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.parse_options = self.parse_options.with_template(template);
        self
    }

    /// Set the template by name.
    pub fn with_template_name(mut self, name: &str) -> Self {
        self.parse_options = self.parse_options.with_template_name(name);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_title(title);
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_author(author);
        self
    }

    /// Treat pipe lines as plain paragraphs.
    pub fn without_tables(mut self) -> Self {
        self.parse_options = self.parse_options.without_tables();
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Parse markup and return a result wrapper.
    pub fn convert(self, markup: &str) -> RtfmarkResult {
        let document = MarkupParser::with_options(self.parse_options).parse(markup);
        RtfmarkResult {
            document,
            render_options: self.render_options,
        }
    }

    /// Parse an RTF string and return a result wrapper.
    pub fn load(self, rtf: &str) -> Result<RtfmarkResult> {
        let document = parse_rtf(rtf)?;
        Ok(RtfmarkResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Rtfmark {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed document ready for rendering.
pub struct RtfmarkResult {
    /// The parsed document
    pub document: Document,

    /// Render options to use
    render_options: RenderOptions,
}

impl RtfmarkResult {
    /// Render to RTF.
    pub fn to_rtf(&self) -> Result<String> {
        render::to_rtf(&self.document, &self.render_options)
    }

    /// Render to RTF along with document statistics.
    pub fn to_rtf_with_stats(&self) -> Result<RenderResult> {
        render::to_rtf_with_stats(&self.document, &self.render_options)
    }

    /// Render to plain text with list markers.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Serialize the document model to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Content statistics.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_blocks(&self.document.blocks)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtfmark_builder() {
        let builder = Rtfmark::new()
            .with_template_name("technical")
            .with_author("Ops")
            .without_tables();
        assert_eq!(builder.parse_options.template, Template::Technical);
        assert_eq!(builder.parse_options.author.as_deref(), Some("Ops"));
        assert!(!builder.parse_options.detect_tables);
    }

    #[test]
    fn test_rtfmark_builder_default() {
        let builder = Rtfmark::default();
        assert_eq!(builder.parse_options.template, Template::Business);
        assert!(builder.render_options.include_info);
    }

    #[test]
    fn test_convert_and_render() {
        let result = Rtfmark::new()
            .with_title("Notes")
            .convert("# Notes\n- one\n- two");
        assert_eq!(result.document().block_count(), 3);

        let rtf = result.to_rtf().unwrap();
        assert!(rtf.starts_with("{\\rtf1"));
        assert!(rtf.contains("{\\title Notes}"));
        assert_eq!(result.to_text(), "Notes\n• one\n• two");
    }

    #[test]
    fn test_stats() {
        let result = Rtfmark::new().convert("# T\n| a | b |\n|---|---|\n| 1 | 2 |");
        let stats = result.stats();
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.cell_count, 4);
    }

    #[test]
    fn test_markup_to_rtf_round_trip() {
        let rtf = markup_to_rtf("Plain and **bold**", "business").unwrap();
        let doc = parse_rtf(&rtf).unwrap();
        assert_eq!(doc.text(), "Plain and bold\n");
        let spans = doc.blocks[0].run().unwrap().spans();
        assert!(spans.iter().any(|s| s.text == "bold" && s.style.bold));
    }

    #[test]
    fn test_load_rtf() {
        let result = Rtfmark::new().load("{\\rtf1 hello\\par}").unwrap();
        assert_eq!(result.document().text(), "hello\n");
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("hello"));
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_parse_rtf_bytes_empty_data() {
        assert!(parse_rtf_bytes(&[]).is_err());
    }

    #[test]
    fn test_parse_rtf_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03];
        assert!(matches!(parse_rtf_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_rtf_unbalanced() {
        assert!(matches!(parse_rtf("{\\rtf1 open"), Err(Error::RtfParse(_))));
    }

    #[test]
    fn test_extract_text_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.rtf");
        std::fs::write(&path, markup_to_rtf("Alpha\nBeta", "meeting").unwrap()).unwrap();
        assert_eq!(extract_text(&path).unwrap(), "Alpha\nBeta\n");
    }
}
