use std::{env, path::PathBuf};

use crate::render::{DEFAULT_JPEG_QUALITY, FlattenSettings, OutputFormat};

/// Runtime configuration of the editor and its filesystem collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub jpeg_quality: u8,
    pub flatten_format: OutputFormat,
    pub store_dir: PathBuf,
    pub outbox_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub fonts_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            flatten_format: OutputFormat::Jpeg,
            store_dir: PathBuf::from("./data/pages"),
            outbox_dir: PathBuf::from("./data/outbox"),
            templates_dir: PathBuf::from("./templates"),
            fonts_dir: None,
        }
    }
}

impl EditorConfig {
    /// Read `MEMORIES_*` variables; unset or unparsable values keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            jpeg_quality: lookup("MEMORIES_JPEG_QUALITY")
                .and_then(|q| q.trim().parse::<u32>().ok())
                .map(|q| q.clamp(1, 100) as u8)
                .unwrap_or(defaults.jpeg_quality),
            flatten_format: lookup("MEMORIES_FLATTEN_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.flatten_format),
            store_dir: path("MEMORIES_STORE_DIR").unwrap_or(defaults.store_dir),
            outbox_dir: path("MEMORIES_OUTBOX_DIR").unwrap_or(defaults.outbox_dir),
            templates_dir: path("MEMORIES_TEMPLATES_DIR").unwrap_or(defaults.templates_dir),
            fonts_dir: path("MEMORIES_FONTS_DIR"),
        }
    }

    pub fn flatten_settings(&self) -> FlattenSettings {
        FlattenSettings {
            format: self.flatten_format,
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
