use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_without_variables() {
    let cfg = EditorConfig::from_lookup(|_| None);
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.jpeg_quality, 80);
    assert_eq!(cfg.flatten_format, OutputFormat::Jpeg);
    assert_eq!(cfg.store_dir, PathBuf::from("./data/pages"));
    assert!(cfg.fonts_dir.is_none());
}

#[test]
fn variables_override_defaults() {
    let cfg = EditorConfig::from_lookup(lookup(&[
        ("MEMORIES_JPEG_QUALITY", "65"),
        ("MEMORIES_FLATTEN_FORMAT", "png"),
        ("MEMORIES_STORE_DIR", "/tmp/pages"),
        ("MEMORIES_FONTS_DIR", "/tmp/fonts"),
    ]));
    assert_eq!(cfg.jpeg_quality, 65);
    assert_eq!(cfg.flatten_format, OutputFormat::Png);
    assert_eq!(cfg.store_dir, PathBuf::from("/tmp/pages"));
    assert_eq!(cfg.fonts_dir, Some(PathBuf::from("/tmp/fonts")));
    assert_eq!(cfg.outbox_dir, PathBuf::from("./data/outbox"));
}

#[test]
fn invalid_values_fall_back_and_quality_clamps() {
    let cfg = EditorConfig::from_lookup(lookup(&[
        ("MEMORIES_JPEG_QUALITY", "lots"),
        ("MEMORIES_FLATTEN_FORMAT", "bmp"),
        ("MEMORIES_TEMPLATES_DIR", ""),
    ]));
    assert_eq!(cfg.jpeg_quality, 80);
    assert_eq!(cfg.flatten_format, OutputFormat::Jpeg);
    assert_eq!(cfg.templates_dir, PathBuf::from("./templates"));

    let cfg = EditorConfig::from_lookup(lookup(&[("MEMORIES_JPEG_QUALITY", "400")]));
    assert_eq!(cfg.jpeg_quality, 100);
    let cfg = EditorConfig::from_lookup(lookup(&[("MEMORIES_JPEG_QUALITY", "0")]));
    assert_eq!(cfg.flatten_settings().jpeg_quality, 1);
}
