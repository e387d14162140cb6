use std::{borrow::Cow, ops::Range, path::Path, sync::Arc};

use anyhow::Context;

use crate::document::{DEFAULT_FONT_SIZE, FontSpec, RichText};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// Font size of legacy floating text items, in page units.
pub const LEGACY_TEXT_SIZE: f32 = 24.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Font bytes registered with a [`FontLibrary`].
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Identity of the shared blob handed to the font collection.
    pub blob_id: u64,
    pub bytes: Arc<Vec<u8>>,
}

/// Shaped text plus the faces its glyph runs may reference.
#[derive(Clone)]
pub struct PreparedText {
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    pub faces: Arc<Vec<FontFace>>,
}

impl std::fmt::Debug for PreparedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedText")
            .field("width", &self.layout.width())
            .field("height", &self.layout.height())
            .field("faces", &self.faces.len())
            .finish()
    }
}

impl PreparedText {
    pub fn width(&self) -> f32 {
        self.layout.width()
    }

    pub fn height(&self) -> f32 {
        self.layout.height()
    }
}

/// Registered fonts plus reusable Parley contexts.
///
/// Only explicitly registered fonts are visible; `"System"` and unknown
/// families resolve to the first registered family.
pub struct FontLibrary {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Arc<Vec<FontFace>>,
    families: Vec<String>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Arc::new(Vec::new()),
            families: Vec::new(),
        }
    }

    /// Family names in registration order.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Register font data (TTF/OTF/TTC); returns the family names it added.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> MemoriesResult<Vec<String>> {
        let bytes = Arc::new(bytes);
        let blob = parley::fontique::Blob::from(bytes.as_ref().clone());
        let blob_id = blob.id();
        let registered = self.font_ctx.collection.register_fonts(blob, None);
        if registered.is_empty() {
            return Err(MemoriesError::validation(
                "no font families registered from font bytes",
            ));
        }

        let mut added = Vec::new();
        for (family_id, _) in registered {
            let name = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| MemoriesError::validation("registered font family has no name"))?
                .to_string();
            if !self.families.contains(&name) {
                self.families.push(name.clone());
            }
            added.push(name);
        }
        Arc::make_mut(&mut self.faces).push(FontFace { blob_id, bytes });
        Ok(added)
    }

    /// Register every `.ttf`, `.otf`, and `.ttc` file in `dir`, in name order.
    pub fn load_dir(&mut self, dir: &Path) -> MemoriesResult<usize> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("read fonts dir '{}'", dir.display()))?
        {
            let path = entry.context("read fonts dir entry")?.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                .unwrap_or(false);
            if is_font {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let bytes =
                std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
            let families = self.register_font(bytes)?;
            tracing::debug!(path = %path.display(), ?families, "registered font");
        }
        Ok(paths.len())
    }

    fn resolve_family(&self, font: &FontSpec) -> MemoriesResult<String> {
        let fallback = self
            .families
            .first()
            .ok_or_else(|| MemoriesError::flatten("no fonts registered for text layout"))?;
        if font.is_default_family() {
            return Ok(fallback.clone());
        }
        Ok(self
            .families
            .iter()
            .find(|f| f.eq_ignore_ascii_case(&font.family))
            .unwrap_or(fallback)
            .clone())
    }

    /// Shape a rich-text body, wrapping lines at `max_width`.
    pub fn layout_rich(&mut self, rich: &RichText, max_width: f32) -> MemoriesResult<PreparedText> {
        let default_family = self.resolve_family(&FontSpec::default())?;
        let mut spans: Vec<(Range<usize>, String, &crate::document::TextStyle)> = Vec::new();
        for (range, style) in rich.spans() {
            spans.push((range, self.resolve_family(&style.font)?, style));
        }

        let text = rich.text();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(font_stack(default_family));
        builder.push_default(parley::style::StyleProperty::FontSize(DEFAULT_FONT_SIZE));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            Rgba8::BLACK,
        )));
        for (range, family, style) in spans {
            let weight = if style.font.bold {
                parley::style::FontWeight::BOLD
            } else {
                parley::style::FontWeight::NORMAL
            };
            builder.push(font_stack(family), range.clone());
            builder.push(
                parley::style::StyleProperty::FontSize(style.font.size),
                range.clone(),
            );
            builder.push(parley::style::StyleProperty::FontWeight(weight), range.clone());
            builder.push(
                parley::style::StyleProperty::Brush(TextBrushRgba8::from(style.color)),
                range,
            );
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width));
        layout.align(
            Some(max_width),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(self.prepared(layout))
    }

    /// Shape a legacy text item: medium weight, centered in `box_width`.
    pub fn layout_centered(&mut self, text: &str, box_width: f32) -> MemoriesResult<PreparedText> {
        let family = self.resolve_family(&FontSpec::default())?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(font_stack(family));
        builder.push_default(parley::style::StyleProperty::FontSize(LEGACY_TEXT_SIZE));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::MEDIUM,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            Rgba8::BLACK,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(box_width));
        layout.align(
            Some(box_width),
            parley::Alignment::Center,
            parley::AlignmentOptions::default(),
        );
        Ok(self.prepared(layout))
    }

    fn prepared(&self, layout: parley::Layout<TextBrushRgba8>) -> PreparedText {
        PreparedText {
            layout: Arc::new(layout),
            faces: Arc::clone(&self.faces),
        }
    }
}

fn font_stack(family: String) -> parley::style::StyleProperty<'static, TextBrushRgba8> {
    parley::style::StyleProperty::FontStack(parley::style::FontStack::Single(
        parley::style::FontFamily::Named(Cow::Owned(family)),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
