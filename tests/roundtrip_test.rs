//! Integration tests: markup rendered to RTF and read back.

use rtfmark::model::FontFamily;
use rtfmark::{
    markup_to_rtf, parse_markup, parse_rtf, render, Block, Color, Document, RenderOptions,
};

const MINUTES: &str = "# Weekly sync\n\
## Decisions\n\
- **Budget** ==approved==\n\
- Hiring *paused* until ~~May~~ June\n\
1. Ship {red}beta{/red} build\n\
2. Review [spec](https://example.com/spec) notes\n\
| Owner | Task |\n\
|---|---|\n\
| Ana | {{Deploy}} |\n\
| Raj | ((Audit)) |\n\
Closing remarks with [[review]] pending.";

fn round_trip(markup: &str, template: &str) -> (Document, Document) {
    let original = rtfmark::parse_markup_with_options(
        markup,
        rtfmark::ParseOptions::new().with_template_name(template),
    );
    let rtf = render::to_rtf(&original, &RenderOptions::default()).unwrap();
    let parsed = parse_rtf(&rtf).unwrap();
    (original, parsed)
}

fn kinds(doc: &Document) -> Vec<&'static str> {
    doc.blocks.iter().map(Block::kind).collect()
}

#[test]
fn test_round_trip_preserves_structure_and_text() {
    let (original, parsed) = round_trip(MINUTES, "business");

    assert_eq!(
        kinds(&original),
        vec![
            "heading",
            "heading",
            "bullet_item",
            "bullet_item",
            "numbered_item",
            "numbered_item",
            "table",
            "paragraph",
        ]
    );
    assert_eq!(kinds(&parsed), kinds(&original));
    assert_eq!(parsed.text(), original.text());
}

#[test]
fn test_round_trip_preserves_heading_levels_and_labels() {
    let (_, parsed) = round_trip(MINUTES, "business");

    assert!(matches!(parsed.blocks[0], Block::Heading { level: 1, .. }));
    assert!(matches!(parsed.blocks[1], Block::Heading { level: 2, .. }));
    assert_eq!(parsed.blocks[4].index(), Some(1));
    assert_eq!(parsed.blocks[5].index(), Some(2));
}

#[test]
fn test_round_trip_preserves_span_styles() {
    let (original, parsed) = round_trip(MINUTES, "business");

    for (before, after) in original.runs().iter().zip(parsed.runs()) {
        let before: Vec<_> = before.spans().iter().filter(|s| !s.text.is_empty()).collect();
        let after = after.spans();
        assert_eq!(before.len(), after.len(), "{:?} vs {:?}", before, after);

        for (b, a) in before.iter().zip(after) {
            assert_eq!(b.text, a.text);
            assert_eq!(b.style.bold, a.style.bold, "bold of '{}'", b.text);
            assert_eq!(b.style.italic, a.style.italic, "italic of '{}'", b.text);
            assert_eq!(b.style.strikethrough, a.style.strikethrough);
            assert_eq!(b.style.foreground, a.style.foreground, "color of '{}'", b.text);
            assert_eq!(b.style.background, a.style.background, "highlight of '{}'", b.text);
            assert_eq!(b.style.link, a.style.link);
            assert_eq!(b.style.font_family, a.style.font_family);
            assert_eq!(b.style.font_size, a.style.font_size);
        }
    }
}

#[test]
fn test_round_trip_markers() {
    let (_, parsed) = round_trip(MINUTES, "business");
    let spans = parsed.blocks[2].run().unwrap().spans();

    assert_eq!(spans[0].text, "Budget");
    assert!(spans[0].style.bold);
    assert_eq!(spans.last().unwrap().text, "approved");
    assert_eq!(spans.last().unwrap().style.background, Some(Color::YELLOW));
}

#[test]
fn test_round_trip_table() {
    let (_, parsed) = round_trip(MINUTES, "business");
    let Block::Table(table) = &parsed.blocks[6] else {
        panic!("expected a table, got {:?}", parsed.blocks[6]);
    };

    assert_eq!(table.column_count(), 2);
    assert_eq!(table.rows.len(), 3);
    assert!(table.rows[0].is_header);
    assert_eq!(table.rows[0].cells[0].shading, Some(Color::HEADER_TINT));
    assert!(table.rows[0].cells[0].text.spans()[0].style.bold);
    assert!(!table.rows[1].is_header);
    assert_eq!(table.rows[1].cells[1].text.plain_text(), "Deploy");
    assert_eq!(
        table.rows[2].cells[1].text.spans()[0].style.background,
        Some(Color::ORANGE)
    );
}

#[test]
fn test_round_trip_technical_template() {
    let (_, parsed) = round_trip("# API\nCall `init` first", "technical");
    let spans = parsed.blocks[1].run().unwrap().spans();

    assert_eq!(spans[0].style.font_family, FontFamily::Monospace);
    assert_eq!(spans[0].style.font_size, 11.0);
    assert_eq!(spans[0].style.foreground, Some(Color::DARK_GRAY));
}

#[test]
fn test_round_trip_meeting_line_spacing() {
    let (_, parsed) = round_trip("Agenda", "meeting");
    let style = parsed.blocks[0].paragraph_style().unwrap();
    assert!((style.line_spacing - 1.5).abs() < 0.01);
}

#[test]
fn test_round_trip_unicode() {
    let markup = "Caf\u{e9} \u{1F600} \u{2014} {braces} back\\slash";
    let (original, parsed) = round_trip(markup, "business");
    assert_eq!(parsed.text(), original.text());
}

#[test]
fn test_round_trip_non_ascii_link_target() {
    let markup = "see [caf\u{e9}](https://example.com/caf\u{e9}) now";
    let (original, parsed) = round_trip(markup, "business");
    let link = |doc: &Document| {
        doc.blocks[0]
            .run()
            .unwrap()
            .spans()
            .iter()
            .find_map(|s| s.style.link.clone())
    };
    assert_eq!(link(&original).as_deref(), Some("https://example.com/caf\u{e9}"));
    assert_eq!(link(&parsed), link(&original));
    assert_eq!(parsed.text(), "see caf\u{e9} now\n");
}

#[test]
fn test_round_trip_literal_marker_text_stays_paragraph() {
    let markup = "3.\tnot a step\n\u{2022}\tnot a bullet\n1. real step";
    let (original, parsed) = round_trip(markup, "business");
    assert_eq!(kinds(&original), vec!["paragraph", "paragraph", "numbered_item"]);
    assert_eq!(kinds(&parsed), kinds(&original));
    assert_eq!(parsed.text(), original.text());
}

#[test]
fn test_round_trip_empty_lines() {
    let (original, parsed) = round_trip("a\n\nb\n", "business");
    assert_eq!(original.block_count(), 4);
    assert_eq!(parsed.block_count(), 4);
    assert_eq!(parsed.text(), "a\n\nb\n\n");
}

#[test]
fn test_metadata_round_trip() {
    let options = rtfmark::ParseOptions::new()
        .with_title("Q3 {plan}")
        .with_author("Ren\u{e9}e");
    let doc = rtfmark::parse_markup_with_options("x", options);
    let rtf = render::to_rtf(&doc, &RenderOptions::default()).unwrap();
    let parsed = parse_rtf(&rtf).unwrap();

    assert_eq!(parsed.metadata.title.as_deref(), Some("Q3 {plan}"));
    assert_eq!(parsed.metadata.author.as_deref(), Some("Ren\u{e9}e"));
}

#[test]
fn test_plain_markup_survives() {
    let markup = "Nothing special here";
    let rtf = markup_to_rtf(markup, "custom").unwrap();
    assert_eq!(parse_rtf(&rtf).unwrap().text(), format!("{}\n", markup));
    assert_eq!(parse_markup(markup).text(), format!("{}\n", markup));
}
