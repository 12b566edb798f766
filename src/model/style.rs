//! Character-level style types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const DARK_GRAY: Color = Color::rgb(85, 85, 85);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const ORANGE: Color = Color::rgb(255, 128, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Shading behind table header cells
    pub const HEADER_TINT: Color = Color::rgb(230, 230, 230);

    /// Create a color from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color name (`"yellow"`, `"red"`, ...) or a hex triple
    /// (`"#FF8000"`, `"ff8000"`).
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        let named = match s.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "gray" | "grey" => Some(Color::GRAY),
            "darkgray" | "darkgrey" | "dark_gray" => Some(Color::DARK_GRAY),
            "yellow" => Some(Color::YELLOW),
            "green" => Some(Color::GREEN),
            "cyan" => Some(Color::CYAN),
            "orange" => Some(Color::ORANGE),
            "red" => Some(Color::RED),
            "blue" => Some(Color::BLUE),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::rgb(component(0)?, component(2)?, component(4)?))
    }

    /// Hex representation, e.g. `#FF8000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Font family used by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Proportional sans-serif (Helvetica)
    #[default]
    Sans,
    /// Fixed-width (Menlo)
    Monospace,
}

impl FontFamily {
    /// Family name written to the font table.
    pub fn base_name(&self) -> &'static str {
        match self {
            FontFamily::Sans => "Helvetica",
            FontFamily::Monospace => "Menlo",
        }
    }

    /// RTF font class control word (without backslash).
    pub fn rtf_class(&self) -> &'static str {
        match self {
            FontFamily::Sans => "fswiss",
            FontFamily::Monospace => "fmodern",
        }
    }

    /// Face name for a weight/slant combination.
    pub fn face_name(&self, bold: bool, italic: bool) -> &'static str {
        match (self, bold, italic) {
            (FontFamily::Sans, false, false) => "Helvetica",
            (FontFamily::Sans, true, false) => "Helvetica-Bold",
            (FontFamily::Sans, false, true) => "Helvetica-Oblique",
            (FontFamily::Sans, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Monospace, false, false) => "Menlo-Regular",
            (FontFamily::Monospace, true, false) => "Menlo-Bold",
            (FontFamily::Monospace, false, true) => "Menlo-Italic",
            (FontFamily::Monospace, true, true) => "Menlo-BoldItalic",
        }
    }
}

/// A font table entry: one family in one weight and slant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontFace {
    /// Font family
    pub family: FontFamily,
    /// Bold weight
    pub bold: bool,
    /// Italic slant
    pub italic: bool,
}

impl FontFace {
    /// Face name written to the font table.
    pub fn name(&self) -> &'static str {
        self.family.face_name(self.bold, self.italic)
    }

    /// Recover a face from a font table name such as `Menlo-Bold` or
    /// `Times New Roman`. Unknown families map to [`FontFamily::Sans`].
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let family = if ["menlo", "courier", "mono", "consolas", "monaco"]
            .iter()
            .any(|m| lower.contains(m))
        {
            FontFamily::Monospace
        } else {
            FontFamily::Sans
        };
        Self {
            family,
            bold: lower.contains("bold"),
            italic: lower.contains("italic") || lower.contains("oblique"),
        }
    }
}

/// Text styling properties of a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Highlight color
    pub background: Option<Color>,

    /// Text color
    pub foreground: Option<Color>,

    /// Font family
    pub font_family: FontFamily,

    /// Font size in points
    pub font_size: f32,

    /// Hyperlink target
    pub link: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            background: None,
            foreground: None,
            font_family: FontFamily::Sans,
            font_size: 12.0,
            link: None,
        }
    }
}

impl Style {
    /// Return a copy with the attributes set in `over` replaced.
    pub fn merge(&self, over: &StyleOverride) -> Style {
        let mut style = self.clone();
        style.apply(over);
        style
    }

    /// Replace the attributes set in `over`, keeping everything else.
    pub fn apply(&mut self, over: &StyleOverride) {
        if let Some(bold) = over.bold {
            self.bold = bold;
        }
        if let Some(italic) = over.italic {
            self.italic = italic;
        }
        if let Some(underline) = over.underline {
            self.underline = underline;
        }
        if let Some(strike) = over.strikethrough {
            self.strikethrough = strike;
        }
        if over.background.is_some() {
            self.background = over.background;
        }
        if over.foreground.is_some() {
            self.foreground = over.foreground;
        }
        if let Some(family) = over.font_family {
            self.font_family = family;
        }
        if let Some(size) = over.font_size {
            self.font_size = size;
        }
        if over.link.is_some() {
            self.link.clone_from(&over.link);
        }
    }

    /// Font table entry this style renders with.
    pub fn font_face(&self) -> FontFace {
        FontFace {
            family: self.font_family,
            bold: self.bold,
            italic: self.italic,
        }
    }

    /// Check if any character emphasis is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.underline
            || self.strikethrough
            || self.background.is_some()
            || self.link.is_some()
    }
}

/// A partial style: only the attributes that are `Some` override the base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverride {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<f32>,
    pub link: Option<String>,
}

impl StyleOverride {
    /// Create an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold.
    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// Set italic.
    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    /// Set underline.
    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    /// Set strikethrough.
    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = Some(true);
        self
    }

    /// Set the highlight color.
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Set the text color.
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Set the font family.
    pub fn family(mut self, family: FontFamily) -> Self {
        self.font_family = Some(family);
        self
    }

    /// Set the font size in points.
    pub fn size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Hyperlink styling: target URL, blue, underlined.
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            link: Some(url.into()),
            foreground: Some(Color::BLUE),
            underline: Some(true),
            ..Default::default()
        }
    }

    /// Check if the override changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("yellow"), Some(Color::YELLOW));
        assert_eq!(Color::parse(" Red "), Some(Color::RED));
        assert_eq!(Color::parse("#ff8000"), Some(Color::ORANGE));
        assert_eq!(Color::parse("00FFFF"), Some(Color::CYAN));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("mauve"), None);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::ORANGE.to_hex(), "#FF8000");
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_merge_overrides_only_given_attributes() {
        let base = Style {
            foreground: Some(Color::DARK_GRAY),
            font_family: FontFamily::Monospace,
            font_size: 11.0,
            ..Default::default()
        };
        let merged = base.merge(&StyleOverride::new().bold().background(Color::YELLOW));

        assert!(merged.bold);
        assert!(!merged.italic);
        assert_eq!(merged.background, Some(Color::YELLOW));
        assert_eq!(merged.foreground, Some(Color::DARK_GRAY));
        assert_eq!(merged.font_family, FontFamily::Monospace);
        assert_eq!(merged.font_size, 11.0);
    }

    #[test]
    fn test_link_override() {
        let style = Style::default().merge(&StyleOverride::link("https://example.com"));
        assert_eq!(style.link.as_deref(), Some("https://example.com"));
        assert_eq!(style.foreground, Some(Color::BLUE));
        assert!(style.underline);
        assert!(style.has_styling());
    }

    #[test]
    fn test_font_face_names() {
        let face = FontFace {
            family: FontFamily::Sans,
            bold: true,
            italic: true,
        };
        assert_eq!(face.name(), "Helvetica-BoldOblique");

        let parsed = FontFace::from_name("Menlo-Italic");
        assert_eq!(parsed.family, FontFamily::Monospace);
        assert!(!parsed.bold);
        assert!(parsed.italic);

        let foreign = FontFace::from_name("Times New Roman");
        assert_eq!(foreign, FontFace::default());
    }
}
