//! Block-level markup parser.

use super::table::{is_separator, is_table_line, TableBuilder};
use super::{InlineFormatter, ParseOptions};
use crate::model::{Block, Document, Metadata};
use crate::template::TemplateStyle;
use regex::Regex;
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

/// Deepest heading level recognized in markup.
const MAX_HEADING_LEVEL: usize = 4;

/// Markup parser producing a [`Document`].
///
/// Lines are classified in priority order: table, heading, bullet item,
/// numbered item, paragraph. Empty lines become empty paragraphs.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    options: ParseOptions,
    style: TemplateStyle,
    formatter: InlineFormatter,
    numbered_regex: Regex,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            style: options.template.style(),
            options,
            formatter: InlineFormatter::new(),
            numbered_regex: Regex::new(r"^\d+\. ").unwrap(),
        }
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse markup text into a document.
    pub fn parse(&self, text: &str) -> Document {
        let text: Cow<'_, str> = if self.options.normalize_unicode {
            Cow::Owned(text.nfc().collect())
        } else {
            Cow::Borrowed(text)
        };

        let mut doc = Document::new();
        doc.metadata = Metadata {
            title: self.options.title.clone(),
            author: self.options.author.clone(),
            created: None,
            template: Some(self.options.template),
        };

        if text.is_empty() {
            return doc;
        }

        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let tables = TableBuilder::new(&self.formatter, &self.style);

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if self.options.detect_tables
                && is_table_line(line)
                && lines.get(i + 1).is_some_and(|next| is_separator(next))
            {
                let end = lines[i + 2..]
                    .iter()
                    .position(|l| !is_table_line(l))
                    .map_or(lines.len(), |p| i + 2 + p);
                let table = tables.build(line, &lines[i + 2..end]);
                doc.add_block(Block::Table(table));
                i = end;
                continue;
            }

            doc.add_block(self.parse_line(line));
            i += 1;
        }

        log::debug!(
            "Parsed markup: {} lines, {} blocks",
            lines.len(),
            doc.block_count()
        );
        doc
    }

    /// Classify one non-table line.
    fn parse_line(&self, line: &str) -> Block {
        if let Some((level, text)) = heading(line) {
            let (style, paragraph) = self.style.heading(level);
            return Block::Heading {
                level,
                style: paragraph,
                run: self.formatter.format(text, &style),
            };
        }

        if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
            let (style, paragraph) = self.style.list_item();
            return Block::BulletItem {
                style: paragraph,
                run: self.formatter.format(text, &style),
            };
        }

        if self.numbered_regex.is_match(line) {
            if let Some((label, text)) = line.split_once(". ") {
                let (style, paragraph) = self.style.list_item();
                return Block::NumberedItem {
                    label: label.to_string(),
                    style: paragraph,
                    run: self.formatter.format(text, &style),
                };
            }
        }

        let (style, paragraph) = self.style.body();
        Block::Paragraph {
            style: paragraph,
            run: self.formatter.format(line, &style),
        }
    }
}

/// Match `#`×1-4 followed by a space.
fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level as u8, text))
}
