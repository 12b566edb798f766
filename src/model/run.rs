//! Styled text runs.

use super::{Style, StyleOverride};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A piece of text sharing one resolved style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: Style,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered, non-overlapping spans covering one block's text.
///
/// Empty spans are never stored, so an empty run has no spans at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyledRun {
    spans: Vec<Span>,
}

impl StyledRun {
    /// Create an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a run holding `text` in a single style.
    pub fn plain(text: impl Into<String>, style: Style) -> Self {
        let mut run = Self::new();
        run.push(Span::new(text, style));
        run
    }

    /// Create a run from spans, dropping empty ones.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut run = Self::new();
        for span in spans {
            run.push(span);
        }
        run
    }

    /// Append a span. Empty spans are dropped.
    pub fn push(&mut self, span: Span) {
        if !span.is_empty() {
            self.spans.push(span);
        }
    }

    /// Append text, extending the last span when the style matches.
    pub fn push_text(&mut self, text: &str, style: &Style) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == *style => last.text.push_str(text),
            _ => self.spans.push(Span::new(text, style.clone())),
        }
    }

    /// The spans in text order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Consume the run and return its spans.
    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Total text length in bytes.
    pub fn len(&self) -> usize {
        self.spans.iter().map(Span::len).sum()
    }

    /// Check if the run holds no text.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Remove the first `len` bytes of text, across span boundaries.
    ///
    /// `len` is clamped to the run length and must fall on a char boundary.
    pub fn strip_prefix(&mut self, len: usize) {
        let mut remaining = len;
        while remaining > 0 && !self.spans.is_empty() {
            let first = &mut self.spans[0];
            if first.len() <= remaining {
                remaining -= first.len();
                self.spans.remove(0);
            } else {
                first.text.drain(..remaining);
                remaining = 0;
            }
        }
    }

    /// Apply `over` to the text in `range` (byte offsets within this run),
    /// splitting spans at the range edges.
    pub fn apply(&mut self, range: Range<usize>, over: &StyleOverride) -> Result<()> {
        let len = self.len();
        let text = self.plain_text();
        if range.start > range.end
            || range.end > len
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return Err(Error::InvalidRange {
                start: range.start,
                length: range.end.saturating_sub(range.start),
                len,
            });
        }
        if range.is_empty() {
            return Ok(());
        }

        let mut result = Vec::with_capacity(self.spans.len() + 2);
        let mut offset = 0;
        for span in std::mem::take(&mut self.spans) {
            let span_start = offset;
            let span_end = offset + span.len();
            offset = span_end;

            let lo = range.start.max(span_start);
            let hi = range.end.min(span_end);
            if lo >= hi {
                result.push(span);
                continue;
            }

            let (a, b) = (lo - span_start, hi - span_start);
            let before = &span.text[..a];
            let inside = &span.text[a..b];
            let after = &span.text[b..];
            if !before.is_empty() {
                result.push(Span::new(before, span.style.clone()));
            }
            result.push(Span::new(inside, span.style.merge(over)));
            if !after.is_empty() {
                result.push(Span::new(after, span.style.clone()));
            }
        }
        self.spans = result;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    fn sample() -> StyledRun {
        let bold = Style {
            bold: true,
            ..Default::default()
        };
        StyledRun::from_spans([
            Span::new("Hello ", Style::default()),
            Span::new("world", bold),
            Span::new(".", Style::default()),
        ])
    }

    #[test]
    fn test_plain_text_and_len() {
        let run = sample();
        assert_eq!(run.plain_text(), "Hello world.");
        assert_eq!(run.len(), 12);
        assert_eq!(run.spans().len(), 3);
    }

    #[test]
    fn test_empty_spans_dropped() {
        let run = StyledRun::from_spans([
            Span::new("", Style::default()),
            Span::new("x", Style::default()),
        ]);
        assert_eq!(run.spans().len(), 1);
        assert!(StyledRun::plain("", Style::default()).is_empty());
    }

    #[test]
    fn test_push_text_extends_matching_span() {
        let mut run = StyledRun::new();
        run.push_text("ab", &Style::default());
        run.push_text("cd", &Style::default());
        assert_eq!(run.spans().len(), 1);
        assert_eq!(run.plain_text(), "abcd");
    }

    #[test]
    fn test_apply_splits_spans() {
        let mut run = sample();
        let over = StyleOverride::new().background(Color::YELLOW);
        run.apply(3..8, &over).unwrap();

        let texts: Vec<&str> = run.spans().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hel", "lo ", "wo", "rld", "."]);
        assert_eq!(run.spans()[0].style.background, None);
        assert_eq!(run.spans()[1].style.background, Some(Color::YELLOW));
        assert!(run.spans()[2].style.bold);
        assert_eq!(run.spans()[2].style.background, Some(Color::YELLOW));
        assert_eq!(run.spans()[3].style.background, None);
        assert_eq!(run.plain_text(), "Hello world.");
    }

    #[test]
    fn test_apply_out_of_range() {
        let mut run = sample();
        let result = run.apply(5..20, &StyleOverride::new().bold());
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn test_apply_rejects_split_char() {
        let mut run = StyledRun::plain("héllo", Style::default());
        let result = run.apply(0..2, &StyleOverride::new().bold());
        assert!(result.is_err());
    }

    #[test]
    fn test_strip_prefix_across_spans() {
        let mut run = sample();
        run.strip_prefix(7);
        assert_eq!(run.plain_text(), "orld.");
        assert!(run.spans()[0].style.bold);
    }
}
