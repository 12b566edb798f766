//! Parsing options and configuration.

use crate::template::Template;

/// Options for parsing markup into a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Template supplying the baseline styles
    pub template: Template,

    /// Normalize input to Unicode NFC before parsing
    pub normalize_unicode: bool,

    /// Recognize pipe tables
    pub detect_tables: bool,

    /// Document title written to the info group
    pub title: Option<String>,

    /// Document author written to the info group
    pub author: Option<String>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Set the template by name; unknown names fall back to business.
    pub fn with_template_name(mut self, name: &str) -> Self {
        self.template = Template::from_name(name);
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Treat pipe lines as plain paragraphs.
    pub fn without_tables(mut self) -> Self {
        self.detect_tables = false;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            template: Template::Business,
            normalize_unicode: true,
            detect_tables: true,
            title: None,
            author: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_template_name("technical")
            .with_normalize_unicode(false)
            .without_tables()
            .with_title("Notes");

        assert_eq!(options.template, Template::Technical);
        assert!(!options.normalize_unicode);
        assert!(!options.detect_tables);
        assert_eq!(options.title.as_deref(), Some("Notes"));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.template, Template::Business);
        assert!(options.normalize_unicode);
        assert!(options.detect_tables);
        assert!(options.author.is_none());
    }
}
