//! Inline markup resolution.
//!
//! Turns one block's raw text into a [`StyledRun`]. Hyperlinks are resolved
//! first; the text between them is then scanned by a fixed, ordered list of
//! rules. A match is kept only if it does not overlap a match accepted
//! earlier, so higher-priority rules win and nothing nests.
//!
//! All matches are tracked as byte ranges into the original text.

use crate::model::{Color, Span, Style, StyleOverride, StyledRun};
use regex::Regex;
use std::ops::Range;
use url::Url;

/// One inline pattern and the style it applies to its capture.
#[derive(Debug, Clone)]
struct InlineRule {
    name: &'static str,
    regex: Regex,
    style: StyleOverride,
    /// A `*` directly before or after the match disqualifies it.
    lone_star: bool,
}

impl InlineRule {
    fn new(name: &'static str, pattern: &str, style: StyleOverride) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            style,
            lone_star: false,
        }
    }
}

/// An accepted match: the full delimited range and the captured content.
#[derive(Debug)]
struct InlineMatch<'a> {
    whole: Range<usize>,
    inner: Range<usize>,
    rule: &'a InlineRule,
}

/// Resolves inline markup into styled spans.
#[derive(Debug, Clone)]
pub struct InlineFormatter {
    link_regex: Regex,
    rules: Vec<InlineRule>,
}

impl Default for InlineFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineFormatter {
    /// Create a formatter with the standard rule set.
    pub fn new() -> Self {
        let mut italic = InlineRule::new("italic", r"\*([^*]+)\*", StyleOverride::new().italic());
        italic.lone_star = true;

        let rules = vec![
            InlineRule::new("bold", r"\*\*(.+?)\*\*", StyleOverride::new().bold()),
            italic,
            InlineRule::new("strikethrough", r"~~(.+?)~~", StyleOverride::new().strikethrough()),
            InlineRule::new(
                "highlight-yellow",
                r"==(.+?)==",
                StyleOverride::new().background(Color::YELLOW),
            ),
            InlineRule::new(
                "highlight-green",
                r"\{\{(.+?)\}\}",
                StyleOverride::new().background(Color::GREEN),
            ),
            InlineRule::new(
                "highlight-blue",
                r"\[\[(.+?)\]\]",
                StyleOverride::new().background(Color::CYAN),
            ),
            InlineRule::new(
                "highlight-orange",
                r"\(\((.+?)\)\)",
                StyleOverride::new().background(Color::ORANGE),
            ),
            InlineRule::new(
                "color-red",
                r"\{red\}(.+?)\{/red\}",
                StyleOverride::new().foreground(Color::RED),
            ),
            InlineRule::new(
                "color-blue",
                r"\{blue\}(.+?)\{/blue\}",
                StyleOverride::new().foreground(Color::BLUE),
            ),
            InlineRule::new(
                "color-green",
                r"\{green\}(.+?)\{/green\}",
                StyleOverride::new().foreground(Color::GREEN),
            ),
        ];

        Self {
            link_regex: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
            rules,
        }
    }

    /// Resolve `text` against `base`.
    ///
    /// The concatenated span text equals `text` with the delimiters of every
    /// accepted match removed, and with whitespace-only captures dropped.
    pub fn format(&self, text: &str, base: &Style) -> StyledRun {
        let mut run = StyledRun::new();
        let mut cursor = 0;

        for caps in self.link_regex.captures_iter(text) {
            let (Some(whole), Some(label), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            self.format_gap(text, cursor..whole.start(), base, &mut run);

            let style = match parse_link(target.as_str()) {
                Some(url) => base.merge(&StyleOverride::link(url)),
                None => {
                    log::debug!("Invalid link target '{}', keeping label as text", target.as_str());
                    base.clone()
                }
            };
            run.push(Span::new(label.as_str(), style));
            cursor = whole.end();
        }

        self.format_gap(text, cursor..text.len(), base, &mut run);
        run
    }

    /// Resolve the non-link text in `gap`.
    fn format_gap(&self, text: &str, gap: Range<usize>, base: &Style, run: &mut StyledRun) {
        if gap.is_empty() {
            return;
        }

        let mut matches: Vec<InlineMatch<'_>> = Vec::new();
        for rule in &self.rules {
            collect_matches(rule, text, &gap, &mut matches);
        }
        matches.sort_by_key(|m| m.whole.start);

        let mut cursor = gap.start;
        for m in &matches {
            run.push(Span::new(&text[cursor..m.whole.start], base.clone()));
            let inner = &text[m.inner.clone()];
            // Whitespace-only captures consume their delimiters and leave nothing.
            if !inner.trim().is_empty() {
                run.push(Span::new(inner, base.merge(&m.rule.style)));
            }
            cursor = m.whole.end;
        }
        run.push(Span::new(&text[cursor..gap.end], base.clone()));
    }
}

/// Add every acceptable match of `rule` inside `gap` to `accepted`.
fn collect_matches<'a>(
    rule: &'a InlineRule,
    text: &str,
    gap: &Range<usize>,
    accepted: &mut Vec<InlineMatch<'a>>,
) {
    let hay = &text[gap.clone()];
    let mut pos = 0;

    while pos < hay.len() {
        let Some(caps) = rule.regex.captures_at(hay, pos) else {
            break;
        };
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let whole_range = gap.start + whole.start()..gap.start + whole.end();
        let inner_range = gap.start + inner.start()..gap.start + inner.end();

        let overlaps = accepted
            .iter()
            .any(|m| m.whole.start < whole_range.end && whole_range.start < m.whole.end);
        let starred = rule.lone_star && touches_star(text, &whole_range);

        if overlaps || starred {
            // Retry from the next character so a later delimiter can still pair up.
            pos = whole.start()
                + hay[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
            continue;
        }

        log::trace!("{} match at {:?}", rule.name, whole_range);
        accepted.push(InlineMatch {
            whole: whole_range,
            inner: inner_range,
            rule,
        });
        pos = whole.end();
    }
}

/// Check whether the byte right before or right after `range` is a `*`.
fn touches_star(text: &str, range: &Range<usize>) -> bool {
    let bytes = text.as_bytes();
    let before = range.start > 0 && bytes[range.start - 1] == b'*';
    let after = bytes.get(range.end) == Some(&b'*');
    before || after
}

/// Parse a link target; only absolute URLs are accepted.
fn parse_link(target: &str) -> Option<String> {
    let target = target.trim();
    if target.chars().any(char::is_whitespace) {
        return None;
    }
    Url::parse(target).ok().map(|_| target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> StyledRun {
        InlineFormatter::new().format(text, &Style::default())
    }

    fn texts(run: &StyledRun) -> Vec<&str> {
        run.spans().iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_plain_text() {
        let run = format("Just text.");
        assert_eq!(texts(&run), vec!["Just text."]);
        assert!(!run.spans()[0].style.has_styling());
    }

    #[test]
    fn test_bold_scenario() {
        let run = format("Hello **world**.");
        assert_eq!(texts(&run), vec!["Hello ", "world", "."]);
        assert!(!run.spans()[0].style.bold);
        assert!(run.spans()[1].style.bold);
        assert!(!run.spans()[2].style.bold);
    }

    #[test]
    fn test_bold_wins_over_embedded_italic() {
        let run = format("**a*b*c**");
        assert_eq!(texts(&run), vec!["a*b*c"]);
        assert!(run.spans()[0].style.bold);
        assert!(!run.spans()[0].style.italic);
    }

    #[test]
    fn test_italic_and_strike() {
        let run = format("an *aside* and ~~gone~~");
        assert_eq!(texts(&run), vec!["an ", "aside", " and ", "gone"]);
        assert!(run.spans()[1].style.italic);
        assert!(run.spans()[3].style.strikethrough);
    }

    #[test]
    fn test_highlights_and_colors() {
        let run = format("==y== {{g}} [[b]] ((o)) {red}r{/red} {blue}u{/blue} {green}n{/green}");
        let spans = run.spans();
        assert_eq!(spans[0].style.background, Some(Color::YELLOW));
        assert_eq!(spans[2].style.background, Some(Color::GREEN));
        assert_eq!(spans[4].style.background, Some(Color::CYAN));
        assert_eq!(spans[6].style.background, Some(Color::ORANGE));
        assert_eq!(spans[8].style.foreground, Some(Color::RED));
        assert_eq!(spans[10].style.foreground, Some(Color::BLUE));
        assert_eq!(spans[12].style.foreground, Some(Color::GREEN));
        assert_eq!(run.plain_text(), "y g b o r u n");
    }

    #[test]
    fn test_valid_link() {
        let run = format("see [docs](https://example.com/a) now");
        assert_eq!(texts(&run), vec!["see ", "docs", " now"]);
        let link = &run.spans()[1].style;
        assert_eq!(link.link.as_deref(), Some("https://example.com/a"));
        assert_eq!(link.foreground, Some(Color::BLUE));
        assert!(link.underline);
    }

    #[test]
    fn test_invalid_link_degrades() {
        let run = format("[x](not a url)");
        assert_eq!(texts(&run), vec!["x"]);
        assert!(run.spans()[0].style.link.is_none());
        assert!(!run.spans()[0].style.underline);
    }

    #[test]
    fn test_link_label_is_not_formatted() {
        let run = format("[**b**](https://example.com) **c**");
        assert_eq!(texts(&run), vec!["**b**", " ", "c"]);
        assert!(!run.spans()[0].style.bold);
        assert!(run.spans()[2].style.bold);
    }

    #[test]
    fn test_blank_capture_is_dropped() {
        let run = format("a **  ** b");
        assert_eq!(run.plain_text(), "a  b");
        assert!(run.spans().iter().all(|s| !s.style.bold));

        let run = format("==   == {{ }}end");
        assert_eq!(run.plain_text(), " end");
        assert!(run.spans().iter().all(|s| s.style.background.is_none()));
    }

    #[test]
    fn test_repeated_text_is_position_based() {
        let run = format("a **a** a");
        assert_eq!(texts(&run), vec!["a ", "a", " a"]);
        assert!(run.spans()[1].style.bold);
        assert!(!run.spans()[2].style.bold);
    }

    #[test]
    fn test_adjacent_spans_stay_separate() {
        let run = format("**a**~~b~~");
        assert_eq!(texts(&run), vec!["a", "b"]);
        assert!(run.spans()[0].style.bold && !run.spans()[0].style.strikethrough);
        assert!(run.spans()[1].style.strikethrough && !run.spans()[1].style.bold);
    }

    #[test]
    fn test_nested_degrades_to_outer() {
        let run = format("**==x==**");
        assert_eq!(texts(&run), vec!["==x=="]);
        assert!(run.spans()[0].style.bold);
        assert_eq!(run.spans()[0].style.background, None);
    }

    #[test]
    fn test_spans_cover_stripped_text() {
        let cases = [
            ("plain", "plain"),
            ("**b** *i* ~~s~~", "b i s"),
            ("x ==h== y {red}r{/red}", "x h y r"),
            ("ünï **cödé** ✓", "ünï cödé ✓"),
            ("***", "***"),
            ("", ""),
        ];
        for (input, expected) in cases {
            let run = format(input);
            assert_eq!(run.plain_text(), expected, "input: {input}");
            assert!(run.spans().iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_base_style_is_inherited() {
        let base = Style {
            font_size: 11.0,
            foreground: Some(Color::DARK_GRAY),
            ..Default::default()
        };
        let run = InlineFormatter::new().format("**x**", &base);
        let style = &run.spans()[0].style;
        assert!(style.bold);
        assert_eq!(style.font_size, 11.0);
        assert_eq!(style.foreground, Some(Color::DARK_GRAY));
    }
}
