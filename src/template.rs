//! Document templates: baseline styles applied before block and inline
//! overrides.

use crate::model::{Alignment, Color, FontFamily, ParagraphStyle, Style};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Indent (and tab stop) of list item text, in points.
pub const LIST_INDENT: f32 = 20.0;

/// Line spacing used by headings.
const HEADING_LINE_SPACING: f32 = 1.15;

/// A named template.
///
/// The set is closed; [`Template::from_name`] never fails and maps anything
/// it does not recognize to [`Template::Business`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Helvetica 12pt, black
    #[default]
    Business,
    /// Menlo 11pt, dark gray
    Technical,
    /// Helvetica 11pt, black, 1.5 line spacing
    Meeting,
    /// Reserved for caller-supplied styling; currently the business look
    Custom,
}

impl Template {
    /// Resolve a template name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "business" | "" => Template::Business,
            "technical" => Template::Technical,
            "meeting" => Template::Meeting,
            "custom" => Template::Custom,
            other => {
                log::debug!("Unknown template '{}', using business", other);
                Template::Business
            }
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Template::Business => "business",
            Template::Technical => "technical",
            Template::Meeting => "meeting",
            Template::Custom => "custom",
        }
    }

    /// All templates.
    pub fn all() -> &'static [Template] {
        &[
            Template::Business,
            Template::Technical,
            Template::Meeting,
            Template::Custom,
        ]
    }

    /// Baseline style bundle.
    pub fn style(&self) -> TemplateStyle {
        let (family, size, color, line_spacing) = match self {
            Template::Business | Template::Custom => (FontFamily::Sans, 12.0, Color::BLACK, 1.0),
            Template::Technical => (FontFamily::Monospace, 11.0, Color::DARK_GRAY, 1.0),
            Template::Meeting => (FontFamily::Sans, 11.0, Color::BLACK, 1.5),
        };
        TemplateStyle {
            base: Style {
                font_family: family,
                font_size: size,
                foreground: Some(color),
                ..Default::default()
            },
            line_spacing,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved baseline attributes of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateStyle {
    /// Character style of body text
    pub base: Style,

    /// Line spacing multiplier of body paragraphs
    pub line_spacing: f32,
}

impl TemplateStyle {
    /// Character and paragraph style of a heading.
    ///
    /// Levels past 4 are styled like level 4.
    pub fn heading(&self, level: u8) -> (Style, ParagraphStyle) {
        let (size, before, after) = match level {
            0 | 1 => (24.0, 0.0, 12.0),
            2 => (18.0, 12.0, 6.0),
            3 => (14.0, 6.0, 3.0),
            _ => (12.0, 3.0, 3.0),
        };
        let style = Style {
            bold: true,
            font_size: size,
            ..self.base.clone()
        };
        let alignment = if level <= 1 {
            Alignment::Center
        } else {
            Alignment::Left
        };
        let mut paragraph = ParagraphStyle::with_line_spacing(HEADING_LINE_SPACING)
            .align(alignment)
            .spacing(before, after);
        paragraph.outline_level = Some(level);
        (style, paragraph)
    }

    /// Character and paragraph style of a bullet or numbered item.
    pub fn list_item(&self) -> (Style, ParagraphStyle) {
        (
            self.base.clone(),
            ParagraphStyle::with_line_spacing(self.line_spacing).hanging(LIST_INDENT),
        )
    }

    /// Character and paragraph style of a body paragraph.
    pub fn body(&self) -> (Style, ParagraphStyle) {
        (
            self.base.clone(),
            ParagraphStyle::with_line_spacing(self.line_spacing),
        )
    }

    /// Character style of a table cell.
    pub fn table_cell(&self, is_header: bool) -> Style {
        Style {
            bold: is_header,
            ..self.base.clone()
        }
    }
}
