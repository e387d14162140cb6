use super::*;

fn red() -> TextStyle {
    TextStyle::new(FontSpec::new("Serif", 24.0), Rgba8::opaque(255, 0, 0))
}

fn body() -> RichText {
    RichText::plain("hello world", TextStyle::default())
}

#[test]
fn plain_text_is_one_run() {
    let t = body();
    assert_eq!(t.runs().len(), 1);
    assert_eq!(t.runs()[0].len, 11);
    assert!(RichText::plain("", TextStyle::default()).runs().is_empty());
}

#[test]
fn font_size_is_clamped() {
    assert_eq!(FontSpec::new("A", 4.0).size, MIN_FONT_SIZE);
    assert_eq!(FontSpec::new("A", 99.0).size, MAX_FONT_SIZE);
    assert_eq!(FontSpec::new("A", f32::NAN).size, DEFAULT_FONT_SIZE);
    assert_eq!(FontSpec::new("A", 30.0).size, 30.0);
}

#[test]
fn apply_style_splits_middle_run() {
    let mut t = body();
    t.apply_style(6..11, &red()).unwrap();
    let spans: Vec<_> = t.spans().map(|(r, s)| (r, s.clone())).collect();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].0, 0..6);
    assert_eq!(spans[1].0, 6..11);
    assert_eq!(spans[1].1, red());

    t.apply_style(2..4, &red()).unwrap();
    assert_eq!(t.runs().len(), 4);
    assert_eq!(t.style_at(3), Some(&red()));
    assert_eq!(t.style_at(5), Some(&TextStyle::default()));
}

#[test]
fn restyling_merges_adjacent_runs() {
    let mut t = body();
    t.apply_style(0..5, &red()).unwrap();
    t.apply_style(5..11, &red()).unwrap();
    assert_eq!(t.runs().len(), 1);
    assert_eq!(t.runs()[0].style, red());
}

#[test]
fn empty_range_is_noop() {
    let mut t = body();
    t.apply_style(3..3, &red()).unwrap();
    assert_eq!(t, body());
}

#[test]
fn insert_uses_given_style_not_neighbors() {
    let mut t = body();
    t.insert_text(5, ",", red()).unwrap();
    assert_eq!(t.text(), "hello, world");
    assert_eq!(t.style_at(5), Some(&red()));
    assert_eq!(t.style_at(4), Some(&TextStyle::default()));
    assert_eq!(t.style_at(6), Some(&TextStyle::default()));
    assert_eq!(t.runs().len(), 3);
}

#[test]
fn insert_into_empty_and_at_end() {
    let mut t = RichText::new();
    t.insert_text(0, "ab", red()).unwrap();
    t.insert_text(2, "cd", TextStyle::default()).unwrap();
    assert_eq!(t.text(), "abcd");
    assert_eq!(t.style_at(4), Some(&TextStyle::default()));
    assert_eq!(t.style_at(1), Some(&red()));
}

#[test]
fn delete_range_drops_runs_and_merges() {
    let mut t = body();
    t.apply_style(5..6, &red()).unwrap();
    t.delete_range(5..6).unwrap();
    assert_eq!(t.text(), "helloworld");
    assert_eq!(t.runs().len(), 1);
}

#[test]
fn offsets_must_be_char_boundaries() {
    let mut t = RichText::plain("caffè!", TextStyle::default());
    // 'è' is two bytes starting at 4.
    assert!(t.apply_style(0..5, &red()).is_err());
    assert!(t.insert_text(5, "x", red()).is_err());
    assert!(t.delete_range(4..99).is_err());
    #[allow(clippy::reversed_empty_ranges)]
    let reversed = 3..1;
    assert!(t.apply_style(reversed, &red()).is_err());
    t.apply_style(4..6, &red()).unwrap();
    assert_eq!(t.style_at(4), Some(&red()));
}

#[test]
fn bytes_roundtrip_mixed_styles() {
    let mut t = body();
    t.apply_style(0..5, &red()).unwrap();
    t.apply_style(
        6..11,
        &TextStyle::new(FontSpec::new("Mono", 14.0).bold(true), Rgba8::opaque(0, 0, 255)),
    )
    .unwrap();
    let bytes = t.to_bytes().unwrap();
    let back = RichText::from_bytes(&bytes).unwrap();
    assert_eq!(back, t);
    assert_eq!(back.to_bytes().unwrap(), bytes);
}

#[test]
fn from_bytes_rejects_inconsistent_runs() {
    let short = br##"{"format":"memories.rich-text","version":1,"text":"abc","runs":[{"len":2,"style":{"font":{"family":"System","size":18.0},"color":"#000000ff"}}]}"##;
    assert!(RichText::from_bytes(short).is_err());

    let foreign = br#"{"format":"rtf","version":1,"text":"","runs":[]}"#;
    assert!(RichText::from_bytes(foreign).is_err());

    let future = br#"{"format":"memories.rich-text","version":9,"text":"","runs":[]}"#;
    assert!(RichText::from_bytes(future).is_err());
}
