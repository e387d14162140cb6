//! Page flattening.
//!
//! `PageDocument -> PreparedPage -> RenderPlan -> FrameRGBA -> encoded bytes`.
//! Preparation front-loads decoding and text shaping; the plan is a flat,
//! backend-agnostic draw list executed by [`CpuBackend`].

pub mod cpu;
pub mod encode;
pub mod plan;
pub mod text;

use std::{fmt, str::FromStr};

use crate::document::PageDocument;
use crate::foundation::core::{Insets, Size};
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::transform::fit_to_viewport;

pub use cpu::CpuBackend;
pub use encode::encode_frame;
pub use plan::{
    AssetId, BODY_INSET, DrawOp, InkRasterizer, PreparedAsset, PreparedPage, RenderPlan,
    RenderResources, aspect_fill, compile_page,
};
pub use text::{FontFace, FontLibrary, LEGACY_TEXT_SIZE, PreparedText, TextBrushRgba8};

/// Default JPEG quality of flattened letters.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = MemoriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(MemoriesError::validation(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlattenSettings {
    pub format: OutputFormat,
    /// 1..=100; only used for JPEG.
    pub jpeg_quality: u8,
}

impl Default for FlattenSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl FlattenSettings {
    pub fn quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}

/// Whole-pixel canvas size for `bounds`.
fn canvas_size(bounds: Size) -> MemoriesResult<(u32, u32)> {
    let Size { width, height } = bounds;
    if !(width.is_finite() && height.is_finite()) || width < 1.0 || height < 1.0 {
        return Err(MemoriesError::flatten(format!(
            "invalid render bounds {width}x{height}"
        )));
    }
    let (w, h) = (width.round(), height.round());
    if w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
        return Err(MemoriesError::flatten(format!(
            "render bounds {w}x{h} exceed {}x{}",
            u16::MAX,
            u16::MAX
        )));
    }
    Ok((w as u32, h as u32))
}

/// Render `doc` into a `bounds`-sized canvas with the page fitted and centered
/// exactly as the editor displays it in a viewport of that size.
pub fn render_page(
    doc: &PageDocument,
    bounds: Size,
    fonts: &mut FontLibrary,
    resources: RenderResources<'_>,
) -> MemoriesResult<FrameRGBA> {
    let (width, height) = canvas_size(bounds)?;
    let fit = fit_to_viewport(
        Size::new(f64::from(width), f64::from(height)),
        0.0,
        Insets::ZERO,
    )
    .map_err(|e| MemoriesError::flatten(e.to_string()))?;

    let prepared = PreparedPage::prepare(doc, fonts, resources)?;
    let plan = compile_page(doc, &prepared, fit, width, height)?;
    CpuBackend::new().execute(&plan, &prepared)
}

/// Composite background, body text, items, and ink into one encoded image.
#[tracing::instrument(skip(doc, fonts, resources), fields(page = %doc.id()))]
pub fn flatten_page(
    doc: &PageDocument,
    bounds: Size,
    fonts: &mut FontLibrary,
    resources: RenderResources<'_>,
    settings: &FlattenSettings,
) -> MemoriesResult<Vec<u8>> {
    let frame = render_page(doc, bounds, fonts, resources)?;
    let bytes = encode_frame(&frame, settings)?;
    tracing::debug!(
        width = frame.width,
        height = frame.height,
        format = %settings.format,
        bytes = bytes.len(),
        "flattened page"
    );
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/render/flatten.rs"]
mod tests;
