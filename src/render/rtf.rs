//! RTF rendering.
//!
//! The body is rendered first so that font and color tables only list what
//! the document actually uses, in order of first use. The regular sans face
//! is always font 0 and color 0 is the reader's automatic color.

use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Color, Document, FontFace, Metadata, ParagraphStyle, Span, Style, StyledRun,
    Table,
};
use chrono::{Datelike, Timelike};

use super::{DocumentStats, RenderOptions, RenderResult};

/// Header opening every document this renderer writes.
pub const RTF_HEADER: &str = "{\\rtf1\\ansi\\ansicpg1252\\deff0\\uc1";

/// Bullet marker written ahead of bullet item text.
pub const BULLET_MARKER: &str = "\u{2022}\t";

/// Paragraph control flagging bullet and numbered items.
const LIST_LEVEL: &str = "\\ilvl0";

/// Convert a document to RTF.
pub fn to_rtf(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = RtfRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to RTF with statistics.
pub fn to_rtf_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = RtfRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// RTF renderer.
pub struct RtfRenderer {
    options: RenderOptions,
    stats: DocumentStats,
    fonts: Vec<FontFace>,
    colors: Vec<Color>,
}

impl RtfRenderer {
    /// Create a new RTF renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: DocumentStats::new(),
            fonts: vec![FontFace::default()],
            colors: Vec::new(),
        }
    }

    /// Render a document to RTF.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to RTF with document statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc)?;
        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        validate(doc)?;

        let mut body = String::new();
        for block in &doc.blocks {
            if self.options.collect_stats {
                self.stats.add_block(block);
            }
            self.render_block(&mut body, block);
        }

        let mut output = String::with_capacity(body.len() + 512);
        output.push_str(RTF_HEADER);
        output.push('\n');
        self.write_font_table(&mut output);
        self.write_color_table(&mut output);
        self.write_info(&mut output, &doc.metadata);
        output.push_str(&format!(
            "\\paperw{}\\paperh{}\\margl{}\\margr{}\\margt{}\\margb{}\\viewkind0\n",
            self.options.paper_width,
            self.options.paper_height,
            self.options.margin_left,
            self.options.margin_right,
            self.options.margin_top,
            self.options.margin_bottom
        ));
        output.push_str(&body);
        output.push_str("}\n");

        if self.options.collect_stats {
            self.stats.font_count = self.fonts.len() as u32;
            self.stats.color_count = self.colors.len() as u32;
        }
        log::debug!(
            "Rendered RTF: {} blocks, {} fonts, {} colors, {} bytes",
            doc.block_count(),
            self.fonts.len(),
            self.colors.len(),
            output.len()
        );
        Ok(output)
    }

    fn write_font_table(&self, output: &mut String) {
        output.push_str("{\\fonttbl");
        for (i, face) in self.fonts.iter().enumerate() {
            output.push_str(&format!(
                "{{\\f{}\\{}\\fcharset0 {};}}",
                i,
                face.family.rtf_class(),
                face.name()
            ));
        }
        output.push_str("}\n");
    }

    fn write_color_table(&self, output: &mut String) {
        output.push_str("{\\colortbl;");
        for color in &self.colors {
            output.push_str(&format!(
                "\\red{}\\green{}\\blue{};",
                color.r, color.g, color.b
            ));
        }
        output.push_str("}\n");
    }

    fn write_info(&self, output: &mut String, metadata: &Metadata) {
        if !self.options.include_info {
            return;
        }
        let created = metadata.created.or(self.options.creation_time);
        if metadata.title.is_none() && metadata.author.is_none() && created.is_none() {
            return;
        }

        output.push_str("{\\info");
        if let Some(ref title) = metadata.title {
            output.push_str(&format!("{{\\title {}}}", escape(title)));
        }
        if let Some(ref author) = metadata.author {
            output.push_str(&format!("{{\\author {}}}", escape(author)));
        }
        if let Some(created) = created {
            output.push_str(&format!(
                "{{\\creatim\\yr{}\\mo{}\\dy{}\\hr{}\\min{}}}",
                created.year(),
                created.month(),
                created.day(),
                created.hour(),
                created.minute()
            ));
        }
        output.push_str("}\n");
    }

    fn render_block(&mut self, output: &mut String, block: &Block) {
        match block {
            Block::Table(table) => self.render_table(output, table),
            Block::BulletItem { style, run } => {
                self.render_paragraph(output, style, Some(BULLET_MARKER), run)
            }
            Block::NumberedItem { label, style, run } => {
                let marker = format!("{}.\t", label);
                self.render_paragraph(output, style, Some(marker.as_str()), run)
            }
            Block::Heading { style, run, .. } | Block::Paragraph { style, run } => {
                self.render_paragraph(output, style, None, run)
            }
        }
    }

    fn render_paragraph(
        &mut self,
        output: &mut String,
        style: &ParagraphStyle,
        marker: Option<&str>,
        run: &StyledRun,
    ) {
        write_paragraph_properties(output, style);
        if marker.is_some() {
            output.push_str(LIST_LEVEL);
        }
        output.push(' ');
        if let Some(marker) = marker {
            let marker_style = marker_style(run);
            self.write_run(output, marker, &marker_style);
        }
        self.write_spans(output, run.spans());
        output.push_str("\\par\n");
    }

    fn render_table(&mut self, output: &mut String, table: &Table) {
        let width = self.options.column_width_for(table.column_count());

        for row in &table.rows {
            let Some(first) = row.cells.first() else {
                continue;
            };
            let pad = twips(self.options.table_padding.unwrap_or(first.padding));

            output.push_str(&format!(
                "\\trowd\\trgaph{pad}\\trpaddl{pad}\\trpaddr{pad}\\trpaddt{pad}\\trpaddb{pad}\
                 \\trpaddfl3\\trpaddfr3\\trpaddft3\\trpaddfb3"
            ));
            if row.is_header {
                output.push_str("\\trhdr");
            }

            for (i, cell) in row.cells.iter().enumerate() {
                let border = self.options.table_border_width.unwrap_or(cell.border.width);
                for side in ["t", "l", "b", "r"] {
                    output.push_str(&format!("\\clbrdr{}\\brdrs\\brdrw{}", side, border));
                }
                if let Some(shading) = cell.shading {
                    let index = self.color_index(shading);
                    output.push_str(&format!("\\clcbpat{}", index));
                }
                output.push_str(&format!("\\cellx{}", width as usize * (i + 1)));
            }
            output.push('\n');

            for cell in &row.cells {
                output.push_str("\\pard\\intbl ");
                self.write_spans(output, cell.text.spans());
                output.push_str("\\cell\n");
            }
            output.push_str("\\row\n");
        }
        output.push_str("\\pard\n");
    }

    fn write_spans(&mut self, output: &mut String, spans: &[Span]) {
        for span in spans {
            match span.style.link {
                Some(ref url) => {
                    output.push_str(&format!(
                        "{{\\field{{\\*\\fldinst{{HYPERLINK \"{}\"}}}}{{\\fldrslt ",
                        escape(&url.replace('"', "%22"))
                    ));
                    self.write_run(output, &span.text, &span.style);
                    output.push_str("}}");
                }
                None => self.write_run(output, &span.text, &span.style),
            }
        }
    }

    fn write_run(&mut self, output: &mut String, text: &str, style: &Style) {
        let font = self.font_index(style.font_face());
        output.push_str(&format!(
            "{{\\f{}\\fs{}",
            font,
            (style.font_size * 2.0).round() as i32
        ));
        if style.bold {
            output.push_str("\\b");
        }
        if style.italic {
            output.push_str("\\i");
        }
        if style.underline {
            output.push_str("\\ul");
        }
        if style.strikethrough {
            output.push_str("\\strike");
        }
        if let Some(color) = style.foreground {
            let index = self.color_index(color);
            output.push_str(&format!("\\cf{}", index));
        }
        if let Some(color) = style.background {
            let index = self.color_index(color);
            output.push_str(&format!("\\cb{}\\chcbpat{}", index, index));
        }
        output.push(' ');
        output.push_str(&escape(text));
        output.push('}');
    }

    /// Font table index of `face`, registering it on first use.
    fn font_index(&mut self, face: FontFace) -> usize {
        match self.fonts.iter().position(|f| *f == face) {
            Some(i) => i,
            None => {
                self.fonts.push(face);
                self.fonts.len() - 1
            }
        }
    }

    /// Color table index of `color` (1-based), registering it on first use.
    fn color_index(&mut self, color: Color) -> usize {
        match self.colors.iter().position(|c| *c == color) {
            Some(i) => i + 1,
            None => {
                self.colors.push(color);
                self.colors.len()
            }
        }
    }
}

/// Reject models that cannot be written as valid RTF.
fn validate(doc: &Document) -> Result<()> {
    for block in &doc.blocks {
        match block {
            Block::Heading { level, .. } if !(1..=4).contains(level) => {
                return Err(Error::Render(format!(
                    "heading level {} is outside 1-4",
                    level
                )));
            }
            Block::Table(table) if table.column_count() == 0 => {
                return Err(Error::Render("table has no columns".to_string()));
            }
            _ => {}
        }
    }

    for run in doc.runs() {
        for span in run.spans() {
            let size = span.style.font_size;
            if !size.is_finite() || size <= 0.0 {
                return Err(Error::Render(format!("invalid font size {}", size)));
            }
        }
    }
    Ok(())
}

fn write_paragraph_properties(output: &mut String, style: &ParagraphStyle) {
    output.push_str("\\pard");
    output.push_str(match style.alignment {
        Alignment::Left => "\\ql",
        Alignment::Center => "\\qc",
        Alignment::Right => "\\qr",
        Alignment::Justify => "\\qj",
    });
    if style.space_before != 0.0 {
        output.push_str(&format!("\\sb{}", twips(style.space_before)));
    }
    if style.space_after != 0.0 {
        output.push_str(&format!("\\sa{}", twips(style.space_after)));
    }
    if style.head_indent != 0.0 {
        output.push_str(&format!("\\li{}", twips(style.head_indent)));
    }
    let first_line = style.first_line_head_indent - style.head_indent;
    if first_line != 0.0 {
        output.push_str(&format!("\\fi{}", twips(first_line)));
    }
    for stop in &style.tab_stops {
        output.push_str(&format!("\\tx{}", twips(*stop)));
    }
    if (style.line_spacing - 1.0).abs() > f32::EPSILON {
        output.push_str(&format!(
            "\\sl{}\\slmult1",
            (style.line_spacing * 240.0).round() as i32
        ));
    }
    if let Some(level) = style.outline_level {
        output.push_str(&format!("\\outlinelevel{}", level.saturating_sub(1)));
    }
}

/// Style of a list marker: the item's font and color, no emphasis.
fn marker_style(run: &StyledRun) -> Style {
    let first = run
        .spans()
        .first()
        .map(|s| s.style.clone())
        .unwrap_or_default();
    Style {
        font_family: first.font_family,
        font_size: first.font_size,
        foreground: first.foreground,
        ..Default::default()
    }
}

/// Points to twips.
fn twips(points: f32) -> i32 {
    (points * 20.0).round() as i32
}

/// Escape text for an RTF body.
///
/// Non-ASCII characters become `\uN?` with N the signed UTF-16 code unit.
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '{' => result.push_str("\\{"),
            '}' => result.push_str("\\}"),
            '\t' => result.push_str("\\tab "),
            '\n' => result.push_str("\\line "),
            '\r' => {}
            c if (c as u32) < 0x20 => result.push_str(&format!("\\'{:02x}", c as u32)),
            c if c.is_ascii() => result.push(c),
            c => {
                for unit in c.encode_utf16(&mut units) {
                    result.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StyleOverride, TableCell, TableRow};
    use chrono::{TimeZone, Utc};

    fn paragraph(run: StyledRun) -> Block {
        Block::Paragraph {
            style: ParagraphStyle::default(),
            run,
        }
    }

    fn render(doc: &Document) -> String {
        to_rtf(doc, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a\\b{c}"), "a\\\\b\\{c\\}");
        assert_eq!(escape("x\ty\nz\r"), "x\\tab y\\line z");
        assert_eq!(escape("caf\u{e9}"), "caf\\u233?");
        assert_eq!(escape("\u{2022}"), "\\u8226?");
        assert_eq!(escape("\u{1F600}"), "\\u-10179?\\u-8704?");
        assert_eq!(escape("\u{1}"), "\\'01");
    }

    #[test]
    fn test_header_and_tables() {
        let mut doc = Document::new();
        let run = StyledRun::from_spans([
            Span::new("plain ", Style::default()),
            Span::new("bold", Style::default().merge(&StyleOverride::new().bold())),
        ]);
        doc.add_block(paragraph(run));
        let rtf = render(&doc);

        assert!(rtf.starts_with(RTF_HEADER));
        assert!(rtf.contains("{\\fonttbl{\\f0\\fswiss\\fcharset0 Helvetica;}{\\f1\\fswiss\\fcharset0 Helvetica-Bold;}}"));
        assert!(rtf.contains("{\\colortbl;}"));
        assert!(rtf.contains("\\paperw12240\\paperh15840\\margl1440"));
        assert!(rtf.contains("{\\f0\\fs24 plain }{\\f1\\fs24\\b bold}\\par"));
        assert!(rtf.trim_end().ends_with('}'));
    }

    #[test]
    fn test_colors_registered_once() {
        let mut doc = Document::new();
        let yellow = Style::default().merge(&StyleOverride::new().background(Color::YELLOW));
        let red = Style::default().merge(&StyleOverride::new().foreground(Color::RED));
        doc.add_block(paragraph(StyledRun::from_spans([
            Span::new("a", yellow.clone()),
            Span::new("b", red),
            Span::new("c", yellow),
        ])));
        let rtf = render(&doc);

        assert!(rtf.contains("{\\colortbl;\\red255\\green255\\blue0;\\red255\\green0\\blue0;}"));
        assert!(rtf.contains("\\cb1\\chcbpat1 a}"));
        assert!(rtf.contains("\\cf2 b}"));
    }

    #[test]
    fn test_paragraph_properties() {
        let mut output = String::new();
        let style = ParagraphStyle::with_line_spacing(1.15)
            .align(Alignment::Center)
            .spacing(0.0, 12.0);
        write_paragraph_properties(&mut output, &style);
        assert_eq!(output, "\\pard\\qc\\sa240\\sl276\\slmult1");

        let mut output = String::new();
        write_paragraph_properties(&mut output, &ParagraphStyle::default().hanging(20.0));
        assert_eq!(output, "\\pard\\ql\\li400\\fi-400\\tx400");
    }

    #[test]
    fn test_bullet_marker() {
        let mut doc = Document::new();
        doc.add_block(Block::BulletItem {
            style: ParagraphStyle::default().hanging(20.0),
            run: StyledRun::plain("item", Style::default().merge(&StyleOverride::new().bold())),
        });
        doc.add_block(Block::NumberedItem {
            label: "7".to_string(),
            style: ParagraphStyle::default().hanging(20.0),
            run: StyledRun::plain("step", Style::default()),
        });
        let rtf = render(&doc);
        assert!(rtf.contains("{\\f0\\fs24 \\u8226?\\tab }{\\f1\\fs24\\b item}"));
        assert!(rtf.contains("{\\f0\\fs24 7.\\tab }{\\f0\\fs24 step}"));
        assert!(rtf.contains("\\tx400\\ilvl0 {\\f0\\fs24 7.\\tab }"));
    }

    #[test]
    fn test_plain_paragraph_has_no_list_level() {
        let mut doc = Document::new();
        doc.add_block(paragraph(StyledRun::plain("3.\tliteral", Style::default())));
        let rtf = render(&doc);
        assert!(!rtf.contains("\\ilvl"));
        assert!(rtf.contains("3.\\tab literal"));
    }

    #[test]
    fn test_link_field() {
        let mut doc = Document::new();
        let style = Style::default().merge(&StyleOverride::link("https://example.com/?q=\"x\""));
        doc.add_block(paragraph(StyledRun::plain("site", style)));
        let rtf = render(&doc);
        assert!(rtf.contains(
            "{\\field{\\*\\fldinst{HYPERLINK \"https://example.com/?q=%22x%22\"}}{\\fldrslt {\\f0\\fs24\\ul\\cf1 site}}}"
        ));
    }

    #[test]
    fn test_table_controls() {
        let mut table = Table::new(2);
        table.add_row(TableRow::header(vec![
            TableCell::header(StyledRun::plain("A", Style::default()), Color::HEADER_TINT),
            TableCell::header(StyledRun::plain("B", Style::default()), Color::HEADER_TINT),
        ]));
        table.add_row(TableRow::new(vec![TableCell::new(StyledRun::plain(
            "1",
            Style::default(),
        ))]));
        let mut doc = Document::new();
        doc.add_block(Block::Table(table));
        let rtf = render(&doc);

        assert!(rtf.contains("\\trowd\\trgaph100\\trpaddl100"));
        assert!(rtf.contains("\\trhdr\\clbrdrt\\brdrs\\brdrw10\\clbrdrl\\brdrs\\brdrw10"));
        assert!(rtf.contains("\\clcbpat1\\cellx4680"));
        assert!(rtf.contains("\\cellx9360"));
        assert!(rtf.contains("\\pard\\intbl {\\f0\\fs24 1}\\cell"));
        assert_eq!(rtf.matches("\\row").count(), 2);
        assert_eq!(rtf.matches("\\cell\n").count(), 3);
    }

    #[test]
    fn test_info_group() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Q3 {plan}".to_string());
        doc.metadata.created = Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap());
        let rtf = render(&doc);
        assert!(rtf.contains("{\\info{\\title Q3 \\{plan\\}}{\\creatim\\yr2024\\mo3\\dy5\\hr14\\min30}}"));

        let options = RenderOptions::new().with_info(false);
        let rtf = to_rtf(&doc, &options).unwrap();
        assert!(!rtf.contains("\\info"));
    }

    #[test]
    fn test_invalid_models_rejected() {
        let mut doc = Document::new();
        doc.add_block(Block::Heading {
            level: 5,
            style: ParagraphStyle::default(),
            run: StyledRun::plain("x", Style::default()),
        });
        assert!(matches!(render_err(&doc), Error::Render(_)));

        let mut doc = Document::new();
        doc.add_block(Block::Table(Table::new(0)));
        assert!(matches!(render_err(&doc), Error::Render(_)));

        let mut doc = Document::new();
        let style = Style {
            font_size: f32::NAN,
            ..Default::default()
        };
        doc.add_block(paragraph(StyledRun::plain("x", style)));
        assert!(matches!(render_err(&doc), Error::Render(_)));
    }

    fn render_err(doc: &Document) -> Error {
        to_rtf(doc, &RenderOptions::default()).unwrap_err()
    }

    #[test]
    fn test_stats() {
        let mut doc = Document::new();
        doc.add_block(paragraph(StyledRun::plain("two words", Style::default())));
        doc.add_block(paragraph(StyledRun::new()));
        let result = to_rtf_with_stats(&doc, &RenderOptions::default()).unwrap();

        assert_eq!(result.stats.paragraph_count, 2);
        assert_eq!(result.stats.word_count, 2);
        assert_eq!(result.stats.font_count, 1);
        assert!(result.content.contains("\\pard\\ql \\par"));
    }
}
