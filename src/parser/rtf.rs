//! RTF document parser.
//!
//! Reads RTF back into the block model: font and color tables, the info
//! group, paragraphs, tables, hyperlink fields and list markers. Anything the
//! model cannot express (pictures, style sheets, headers) is skipped.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Border, Color, Document, FontFace, Metadata, ParagraphStyle, Style,
    StyledRun, Table, TableCell, TableRow,
};

use super::lexer::{tokenize, Token};

/// Destinations whose content is never part of the document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "stylesheet",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "footnote",
    "annotation",
    "listtable",
    "listoverridetable",
    "revtbl",
    "rsidtbl",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "falt",
    "panose",
    "revtim",
    "printim",
    "buptim",
    "operator",
    "keywords",
    "comment",
    "doccomm",
    "subject",
    "company",
    "category",
    "manager",
    "bkmkstart",
    "bkmkend",
];

/// RTF document parser.
pub struct RtfParser {
    source: String,
}

impl RtfParser {
    /// Open an RTF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Load RTF from bytes.
    ///
    /// The header is checked first; invalid UTF-8 is replaced rather than
    /// rejected since RTF bodies are expected to be 7-bit.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        log::debug!("Detected {} ({} bytes)", format, data.len());

        let text = String::from_utf8_lossy(data);
        let source = text.trim_start_matches('\u{feff}').to_string();
        Ok(Self { source })
    }

    /// Load RTF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Load RTF from a string.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Parse the document.
    pub fn parse(&self) -> Result<Document> {
        let tokens = tokenize(&self.source)?;
        let mut interpreter = Interpreter::new();
        for token in tokens {
            if interpreter.finished {
                break;
            }
            interpreter.handle(token)?;
        }
        interpreter.finish()
    }
}

/// Where text inside the current group goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Body,
    FontTable,
    ColorTable,
    Info,
    Title,
    Author,
    Creatim,
    FieldInstruction,
    Skip,
}

/// Character formatting in effect.
#[derive(Debug, Clone)]
struct CharState {
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    font: i32,
    half_points: i32,
    foreground: usize,
    background: usize,
    link: Option<String>,
}

impl Default for CharState {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            font: 0,
            half_points: 24,
            foreground: 0,
            background: 0,
            link: None,
        }
    }
}

#[derive(Debug, Clone)]
struct GroupState {
    destination: Destination,
    chars: CharState,
    unicode_skip: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            destination: Destination::Body,
            chars: CharState::default(),
            unicode_skip: 1,
        }
    }
}

/// Paragraph properties as read, in twips.
#[derive(Debug, Clone, Default)]
struct ParaState {
    alignment: Alignment,
    space_before: i32,
    space_after: i32,
    left_indent: i32,
    first_indent: i32,
    tab_stops: Vec<i32>,
    line_spacing: Option<i32>,
    outline_level: Option<i32>,
    list: bool,
    in_table: bool,
}

impl ParaState {
    fn to_style(&self) -> ParagraphStyle {
        let head = self.left_indent as f32 / 20.0;
        ParagraphStyle {
            alignment: self.alignment,
            space_before: self.space_before as f32 / 20.0,
            space_after: self.space_after as f32 / 20.0,
            head_indent: head,
            first_line_head_indent: head + self.first_indent as f32 / 20.0,
            tab_stops: self.tab_stops.iter().map(|t| *t as f32 / 20.0).collect(),
            line_spacing: self
                .line_spacing
                .filter(|sl| *sl > 0)
                .map_or(1.0, |sl| sl as f32 / 240.0),
            outline_level: None,
        }
    }
}

/// Cell definition from `\clcbpat`, `\brdrw` and `\cellx`.
#[derive(Debug, Clone, Default)]
struct CellDef {
    shading: Option<usize>,
    border: Option<u16>,
}

/// Table being assembled.
#[derive(Debug, Default)]
struct TableState {
    rows: Vec<TableRow>,
    defs: Vec<CellDef>,
    pending_def: CellDef,
    is_header: bool,
    padding: Option<i32>,
    cells: Vec<TableCell>,
}

#[derive(Debug, Default)]
struct CreationTime {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: u32,
    minute: u32,
}

impl CreationTime {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let (year, month, day) = (self.year?, self.month?, self.day?);
        Utc.with_ymd_and_hms(year, month, day, self.hour, self.minute, 0)
            .single()
    }
}

/// Token-driven state machine building the document.
struct Interpreter {
    stack: Vec<GroupState>,
    finished: bool,
    star_pending: bool,
    skip_chars: usize,
    high_surrogate: Option<u16>,

    fonts: Vec<(i32, String)>,
    font_id: i32,
    font_name: String,
    colors: Vec<Option<Color>>,
    rgb: (Option<u8>, Option<u8>, Option<u8>),

    metadata: Metadata,
    created: CreationTime,
    field_instruction: String,

    para: ParaState,
    run: StyledRun,
    table: Option<TableState>,
    blocks: Vec<Block>,
}

impl Interpreter {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            finished: false,
            star_pending: false,
            skip_chars: 0,
            high_surrogate: None,
            fonts: Vec::new(),
            font_id: 0,
            font_name: String::new(),
            colors: Vec::new(),
            rgb: (None, None, None),
            metadata: Metadata::default(),
            created: CreationTime::default(),
            field_instruction: String::new(),
            para: ParaState::default(),
            run: StyledRun::new(),
            table: None,
            blocks: Vec::new(),
        }
    }

    fn state(&mut self) -> Result<&mut GroupState> {
        self.stack
            .last_mut()
            .ok_or_else(|| Error::RtfParse("content outside the document group".to_string()))
    }

    fn destination(&self) -> Destination {
        self.stack
            .last()
            .map_or(Destination::Skip, |s| s.destination)
    }

    fn handle(&mut self, token: Token<'_>) -> Result<()> {
        match token {
            Token::GroupStart => {
                let state = self.stack.last().cloned().unwrap_or_default();
                self.stack.push(state);
                self.skip_chars = 0;
                Ok(())
            }
            Token::GroupEnd => self.end_group(),
            Token::ControlWord { name, param } => {
                let starred = std::mem::take(&mut self.star_pending);
                self.control_word(name, param, starred)
            }
            Token::ControlSymbol(c) => self.control_symbol(c),
            Token::HexByte(byte) => {
                if self.skip_chars > 0 {
                    self.skip_chars -= 1;
                    return Ok(());
                }
                self.text(&cp1252(byte).to_string())
            }
            Token::Text(text) => {
                let text = self.skip_fallback(text);
                self.text(text)
            }
        }
    }

    fn end_group(&mut self) -> Result<()> {
        let state = self
            .stack
            .pop()
            .ok_or_else(|| Error::RtfParse("unbalanced closing brace".to_string()))?;
        self.skip_chars = 0;

        if state.destination == Destination::FontTable && !self.font_name.is_empty() {
            self.finish_font();
        }
        if self.stack.is_empty() {
            self.finished = true;
        }
        Ok(())
    }

    /// Drop the `\uN` fallback characters still owed.
    fn skip_fallback<'t>(&mut self, text: &'t str) -> &'t str {
        if self.skip_chars == 0 {
            return text;
        }
        let mut chars = text.char_indices();
        while self.skip_chars > 0 {
            match chars.next() {
                Some(_) => self.skip_chars -= 1,
                None => return "",
            }
        }
        chars.next().map_or("", |(i, _)| &text[i..])
    }

    fn control_symbol(&mut self, c: char) -> Result<()> {
        match c {
            '*' => {
                self.star_pending = true;
                Ok(())
            }
            '\\' | '{' | '}' => self.text(&c.to_string()),
            '~' => self.text("\u{a0}"),
            '_' => self.text("\u{2011}"),
            // Optional hyphens and unknown symbols produce no text.
            _ => Ok(()),
        }
    }

    fn control_word(&mut self, name: &str, param: Option<i32>, starred: bool) -> Result<()> {
        if self.destination() == Destination::Skip {
            return Ok(());
        }

        // Destinations
        match name {
            "fonttbl" => return self.set_destination(Destination::FontTable),
            "colortbl" => return self.set_destination(Destination::ColorTable),
            "info" => return self.set_destination(Destination::Info),
            "title" => return self.set_destination(Destination::Title),
            "author" => return self.set_destination(Destination::Author),
            "creatim" => return self.set_destination(Destination::Creatim),
            "field" => {
                self.field_instruction.clear();
                return Ok(());
            }
            "fldinst" => return self.set_destination(Destination::FieldInstruction),
            "fldrslt" => {
                let link = hyperlink_target(&self.field_instruction);
                let state = self.state()?;
                state.destination = Destination::Body;
                if link.is_some() {
                    state.chars.link = link;
                }
                return Ok(());
            }
            _ if starred || SKIPPED_DESTINATIONS.contains(&name) => {
                log::trace!("Skipping destination \\{}", name);
                return self.set_destination(Destination::Skip);
            }
            _ => {}
        }

        match self.destination() {
            Destination::FontTable => {
                if name == "f" {
                    self.font_id = param.unwrap_or(0);
                }
                Ok(())
            }
            Destination::ColorTable => {
                let value = param.map(|p| p.clamp(0, 255) as u8);
                match name {
                    "red" => self.rgb.0 = value,
                    "green" => self.rgb.1 = value,
                    "blue" => self.rgb.2 = value,
                    _ => {}
                }
                Ok(())
            }
            Destination::Creatim => {
                let value = param.unwrap_or(0);
                match name {
                    "yr" => self.created.year = Some(value),
                    "mo" => self.created.month = u32::try_from(value).ok(),
                    "dy" => self.created.day = u32::try_from(value).ok(),
                    "hr" => self.created.hour = u32::try_from(value).unwrap_or(0),
                    "min" => self.created.minute = u32::try_from(value).unwrap_or(0),
                    _ => {}
                }
                Ok(())
            }
            Destination::Body => self.body_word(name, param),
            Destination::Title | Destination::Author | Destination::FieldInstruction => match name {
                "u" => self.unicode(param.unwrap_or(0)),
                "uc" => {
                    self.state()?.unicode_skip = usize::try_from(param.unwrap_or(1)).unwrap_or(1);
                    Ok(())
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn set_destination(&mut self, destination: Destination) -> Result<()> {
        self.state()?.destination = destination;
        Ok(())
    }

    fn body_word(&mut self, name: &str, param: Option<i32>) -> Result<()> {
        let on = param != Some(0);
        match name {
            // Paragraphs
            "par" => self.end_paragraph(),
            "pard" => self.para = ParaState::default(),
            "ql" => self.para.alignment = Alignment::Left,
            "qc" => self.para.alignment = Alignment::Center,
            "qr" => self.para.alignment = Alignment::Right,
            "qj" => self.para.alignment = Alignment::Justify,
            "sb" => self.para.space_before = param.unwrap_or(0),
            "sa" => self.para.space_after = param.unwrap_or(0),
            "li" => self.para.left_indent = param.unwrap_or(0),
            "fi" => self.para.first_indent = param.unwrap_or(0),
            "tx" => self.para.tab_stops.push(param.unwrap_or(0)),
            "sl" => self.para.line_spacing = param,
            "outlinelevel" => self.para.outline_level = param,
            "ls" | "ilvl" => self.para.list = true,
            "intbl" => self.para.in_table = true,

            // Special characters
            "line" => self.text("\n")?,
            "tab" => self.text("\t")?,
            "emdash" => self.text("\u{2014}")?,
            "endash" => self.text("\u{2013}")?,
            "bullet" => self.text("\u{2022}")?,
            "lquote" => self.text("\u{2018}")?,
            "rquote" => self.text("\u{2019}")?,
            "ldblquote" => self.text("\u{201c}")?,
            "rdblquote" => self.text("\u{201d}")?,
            "u" => self.unicode(param.unwrap_or(0))?,
            "uc" => {
                self.state()?.unicode_skip = usize::try_from(param.unwrap_or(1)).unwrap_or(1);
            }

            // Characters
            "plain" => {
                let state = self.state()?;
                let link = state.chars.link.take();
                state.chars = CharState {
                    link,
                    ..Default::default()
                };
            }
            "b" => self.state()?.chars.bold = on,
            "i" => self.state()?.chars.italic = on,
            "ul" => self.state()?.chars.underline = on,
            "ulnone" => self.state()?.chars.underline = false,
            "strike" => self.state()?.chars.strikethrough = on,
            "f" => self.state()?.chars.font = param.unwrap_or(0),
            "fs" => self.state()?.chars.half_points = param.unwrap_or(24),
            "cf" => self.state()?.chars.foreground = color_ref(param),
            "cb" | "chcbpat" => self.state()?.chars.background = color_ref(param),

            // Tables
            "trowd" => self.start_row(),
            "trhdr" => self.table_mut().is_header = true,
            "trpaddl" => self.table_mut().padding = param,
            "clcbpat" => self.table_mut().pending_def.shading = Some(color_ref(param)),
            "brdrw" => {
                self.table_mut().pending_def.border = param.and_then(|p| u16::try_from(p).ok())
            }
            "cellx" => {
                let table = self.table_mut();
                let def = std::mem::take(&mut table.pending_def);
                table.defs.push(def);
            }
            "cell" => self.end_cell(),
            "row" => self.end_row(),
            _ => {}
        }
        Ok(())
    }

    fn unicode(&mut self, param: i32) -> Result<()> {
        let unit = param as i16 as u16;
        self.skip_chars = self.state()?.unicode_skip;

        let c = match (self.high_surrogate.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(unit);
                return Ok(());
            }
            (Some(high), 0xDC00..=0xDFFF) => {
                char::decode_utf16([high, unit]).next().and_then(|r| r.ok())
            }
            (_, unit) => char::from_u32(unit as u32),
        };
        self.text(&c.unwrap_or('\u{fffd}').to_string())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        match self.destination() {
            Destination::Body => {
                let style = self.current_style()?;
                self.run.push_text(text, &style);
            }
            Destination::FontTable => {
                let mut parts = text.split(';');
                if let Some(first) = parts.next() {
                    self.font_name.push_str(first);
                }
                for part in parts {
                    self.finish_font();
                    self.font_name.push_str(part);
                }
            }
            Destination::ColorTable => {
                for _ in text.matches(';') {
                    let color = match self.rgb {
                        (None, None, None) => None,
                        (r, g, b) => Some(Color::rgb(
                            r.unwrap_or(0),
                            g.unwrap_or(0),
                            b.unwrap_or(0),
                        )),
                    };
                    self.colors.push(color);
                    self.rgb = (None, None, None);
                }
            }
            Destination::Title => append(&mut self.metadata.title, text),
            Destination::Author => append(&mut self.metadata.author, text),
            Destination::FieldInstruction => self.field_instruction.push_str(text),
            Destination::Info | Destination::Creatim | Destination::Skip => {}
        }
        Ok(())
    }

    fn finish_font(&mut self) {
        let name = self.font_name.trim().to_string();
        self.font_name.clear();
        if !name.is_empty() {
            self.fonts.retain(|(id, _)| *id != self.font_id);
            self.fonts.push((self.font_id, name));
        }
    }

    fn current_style(&mut self) -> Result<Style> {
        let chars = self.state()?.chars.clone();
        let face = self
            .fonts
            .iter()
            .find(|(id, _)| *id == chars.font)
            .map(|(_, name)| FontFace::from_name(name))
            .unwrap_or_default();
        let half_points = if chars.half_points > 0 {
            chars.half_points
        } else {
            24
        };

        Ok(Style {
            bold: chars.bold || face.bold,
            italic: chars.italic || face.italic,
            underline: chars.underline,
            strikethrough: chars.strikethrough,
            background: self.color(chars.background),
            foreground: self.color(chars.foreground),
            font_family: face.family,
            font_size: half_points as f32 / 2.0,
            link: chars.link,
        })
    }

    fn color(&self, index: usize) -> Option<Color> {
        if index == 0 {
            return None;
        }
        self.colors.get(index).copied().flatten()
    }

    fn end_paragraph(&mut self) {
        let run = std::mem::take(&mut self.run);
        if self.para.in_table {
            // A paragraph break inside a cell stays part of the cell text.
            let style = run.spans().last().map(|s| s.style.clone()).unwrap_or_default();
            self.run = run;
            self.run.push_text("\n", &style);
            return;
        }
        self.close_table();
        let block = paragraph_block(&self.para, run);
        self.blocks.push(block);
    }

    fn table_mut(&mut self) -> &mut TableState {
        self.table.get_or_insert_with(TableState::default)
    }

    fn start_row(&mut self) {
        let table = self.table_mut();
        table.defs.clear();
        table.pending_def = CellDef::default();
        table.is_header = false;
        table.padding = None;
        table.cells.clear();
    }

    fn end_cell(&mut self) {
        let text = std::mem::take(&mut self.run);
        let table = self.table_mut();
        let def = table.defs.get(table.cells.len()).cloned().unwrap_or_default();
        let is_header = table.is_header;
        let padding = table
            .padding
            .map_or(TableCell::DEFAULT_PADDING, |p| p as f32 / 20.0);
        let shading = def.shading.and_then(|i| self.color(i));
        let border = def.border.map_or(Border::HAIRLINE, |width| Border { width });

        let table = self.table_mut();
        table.cells.push(TableCell {
            text,
            is_header,
            shading,
            border,
            padding,
        });
    }

    fn end_row(&mut self) {
        let table = self.table_mut();
        let cells = std::mem::take(&mut table.cells);
        let row = if table.is_header {
            TableRow::header(cells)
        } else {
            TableRow::new(cells)
        };
        table.rows.push(row);
    }

    fn close_table(&mut self) {
        let Some(state) = self.table.take() else {
            return;
        };
        if state.rows.is_empty() {
            return;
        }
        let columns = state.rows.first().map_or(0, |r| r.cells.len());
        let mut table = Table::new(columns);
        for row in state.rows {
            table.add_row(row);
        }
        self.blocks.push(Block::Table(table));
    }

    fn finish(mut self) -> Result<Document> {
        if !self.stack.is_empty() {
            return Err(Error::RtfParse(format!(
                "unexpected end of input inside {} open group(s)",
                self.stack.len()
            )));
        }
        if !self.run.is_empty() {
            self.para.in_table = false;
            self.end_paragraph();
        }
        self.close_table();

        self.metadata.created = self.created.to_datetime();
        for field in [&mut self.metadata.title, &mut self.metadata.author] {
            if let Some(value) = field {
                let trimmed = value.trim().to_string();
                *field = (!trimmed.is_empty()).then_some(trimmed);
            }
        }

        log::debug!(
            "Parsed RTF: {} blocks, {} fonts, {} colors",
            self.blocks.len(),
            self.fonts.len(),
            self.colors.len()
        );
        Ok(Document {
            metadata: self.metadata,
            blocks: self.blocks,
        })
    }
}

/// Turn a finished paragraph into the block it encodes.
fn paragraph_block(para: &ParaState, mut run: StyledRun) -> Block {
    let mut style = para.to_style();

    if let Some(level) = para.outline_level.filter(|l| (0..4).contains(l)) {
        let level = level as u8 + 1;
        style.outline_level = Some(level);
        return Block::Heading { level, style, run };
    }

    // Marker text only counts on paragraphs flagged as list items.
    if !para.list {
        return Block::Paragraph { style, run };
    }

    let text = run.plain_text();
    let indent = text.len() - text.trim_start_matches('\t').len();
    let rest = &text[indent..];

    if let Some(after) = rest.strip_prefix("\u{2022}\t") {
        run.strip_prefix(text.len() - after.len());
        return Block::BulletItem { style, run };
    }

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(after) = rest[digits..].strip_prefix(".\t") {
            let label = rest[..digits].to_string();
            run.strip_prefix(text.len() - after.len());
            return Block::NumberedItem { label, style, run };
        }
    }

    Block::Paragraph { style, run }
}

/// Extract the target of a `HYPERLINK "url"` field instruction.
fn hyperlink_target(instruction: &str) -> Option<String> {
    let rest = instruction.trim().strip_prefix("HYPERLINK")?.trim_start();
    let target = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next()?,
        None => rest.split_whitespace().next()?,
    };
    (!target.is_empty()).then(|| target.to_string())
}

fn color_ref(param: Option<i32>) -> usize {
    param.and_then(|p| usize::try_from(p).ok()).unwrap_or(0)
}

fn append(field: &mut Option<String>, text: &str) {
    field.get_or_insert_with(String::new).push_str(text);
}

/// Decode one Windows-1252 byte.
fn cp1252(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
        '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
        '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
        '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
    ];
    match byte {
        0x80..=0x9F => HIGH[(byte - 0x80) as usize],
        b => b as char,
    }
}
