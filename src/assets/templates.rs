use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::assets::decode::{PreparedImage, PreparedSvg, decode_image, parse_svg};
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// Names of the background templates shipped with the editor.
pub const BACKGROUND_TEMPLATES: &[&str] = &["letterbg1"];

const EXTENSIONS: &[(&str, TemplateFormat)] = &[
    ("png", TemplateFormat::Raster),
    ("jpg", TemplateFormat::Raster),
    ("jpeg", TemplateFormat::Raster),
    ("svg", TemplateFormat::Svg),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateFormat {
    Raster,
    Svg,
}

/// Encoded bytes of a background template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateBytes {
    pub format: TemplateFormat,
    pub bytes: Vec<u8>,
}

/// Decoded template ready to draw.
#[derive(Clone, Debug)]
pub enum PreparedTemplate {
    Raster(PreparedImage),
    Svg(PreparedSvg),
}

impl TemplateBytes {
    pub fn prepare(&self) -> MemoriesResult<PreparedTemplate> {
        match self.format {
            TemplateFormat::Raster => decode_image(&self.bytes).map(PreparedTemplate::Raster),
            TemplateFormat::Svg => parse_svg(&self.bytes).map(PreparedTemplate::Svg),
        }
    }
}

/// Resolves a background template name to displayable bytes.
pub trait TemplateSource: Send + Sync {
    /// `Ok(None)` when no template has that name.
    fn template_bytes(&self, name: &str) -> MemoriesResult<Option<TemplateBytes>>;
}

impl TemplateSource for HashMap<String, TemplateBytes> {
    fn template_bytes(&self, name: &str) -> MemoriesResult<Option<TemplateBytes>> {
        Ok(self.get(name).cloned())
    }
}

/// Templates stored as `<root>/<name>.{png,jpg,jpeg,svg}`.
#[derive(Clone, Debug)]
pub struct DirTemplateSource {
    root: PathBuf,
}

impl DirTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirTemplateSource {
    fn template_bytes(&self, name: &str) -> MemoriesResult<Option<TemplateBytes>> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(MemoriesError::validation(format!(
                "invalid template name '{name}'"
            )));
        }
        for (ext, format) in EXTENSIONS {
            let path = self.root.join(format!("{name}.{ext}"));
            if !path.is_file() {
                continue;
            }
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read template '{}'", path.display()))?;
            tracing::debug!(template = name, path = %path.display(), "resolved background template");
            return Ok(Some(TemplateBytes {
                format: *format,
                bytes,
            }));
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/templates.rs"]
mod tests;
