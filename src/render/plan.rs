use std::collections::HashMap;

use crate::assets::{PreparedImage, PreparedSvg, PreparedTemplate, TemplateSource};
use crate::document::{Background, ItemContent, ItemId, PageDocument};
use crate::foundation::core::{
    Affine, PAGE_SIZE, Rect, Rgba8, Size, Vec2, page_rect,
};
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::render::text::{FontLibrary, PreparedText};
use crate::transform::ViewportFit;

/// Inset, in page units, between the page edge and the rich-text body.
pub const BODY_INSET: f64 = 60.0;

/// Turns the opaque drawing blob into a raster layer covering the page.
pub trait InkRasterizer: Send + Sync {
    /// `Ok(None)` when the drawing has nothing visible.
    fn rasterize(&self, drawing: &[u8], page: Size) -> MemoriesResult<Option<PreparedImage>>;
}

/// Collaborators consulted while preparing a page for rendering.
#[derive(Clone, Copy, Default)]
pub struct RenderResources<'a> {
    pub templates: Option<&'a dyn TemplateSource>,
    pub ink: Option<&'a dyn InkRasterizer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetId(pub u32);

#[derive(Clone, Debug)]
pub enum PreparedAsset {
    Image(PreparedImage),
    Svg(PreparedSvg),
    Text(PreparedText),
}

/// Decoded assets of one page, addressed by [`AssetId`].
///
/// All decoding and text shaping happens here so that plan execution does no
/// IO and no parsing.
#[derive(Debug, Default)]
pub struct PreparedPage {
    assets: Vec<PreparedAsset>,
    background: Option<AssetId>,
    body: Option<AssetId>,
    items: HashMap<ItemId, AssetId>,
    ink: Option<AssetId>,
}

impl PreparedPage {
    #[tracing::instrument(skip_all, fields(page = %doc.id(), items = doc.items().len()))]
    pub fn prepare(
        doc: &PageDocument,
        fonts: &mut FontLibrary,
        resources: RenderResources<'_>,
    ) -> MemoriesResult<Self> {
        let mut out = Self::default();

        if let Background::Image(name) = doc.active_background() {
            out.background = out.prepare_template(&name, resources.templates)?;
        }

        if let Some(rich) = doc.rich_body()?
            && !rich.is_empty()
        {
            let width = (PAGE_SIZE.width - 2.0 * BODY_INSET) as f32;
            let text = fonts.layout_rich(&rich, width)?;
            out.body = Some(out.insert(PreparedAsset::Text(text)));
        }

        for item in doc.items() {
            let asset = match &item.content {
                ItemContent::Image(bytes) => {
                    let img = crate::assets::decode_image(bytes).map_err(|e| {
                        MemoriesError::flatten(format!("item {} image: {e}", item.id))
                    })?;
                    PreparedAsset::Image(img)
                }
                ItemContent::Text(text) if text.is_empty() => continue,
                ItemContent::Text(text) => {
                    PreparedAsset::Text(fonts.layout_centered(text, item.frame.width() as f32)?)
                }
            };
            let id = out.insert(asset);
            out.items.insert(item.id, id);
        }

        if let Some(ink) = resources.ink
            && !doc.drawing_data().is_empty()
            && let Some(img) = ink.rasterize(doc.drawing_data(), PAGE_SIZE)?
        {
            out.ink = Some(out.insert(PreparedAsset::Image(img)));
        }

        Ok(out)
    }

    pub fn get(&self, id: AssetId) -> MemoriesResult<&PreparedAsset> {
        self.assets
            .get(id.0 as usize)
            .ok_or_else(|| MemoriesError::flatten(format!("unknown asset {id:?}")))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub(crate) fn insert(&mut self, asset: PreparedAsset) -> AssetId {
        let id = AssetId(self.assets.len() as u32);
        self.assets.push(asset);
        id
    }

    fn prepare_template(
        &mut self,
        name: &str,
        templates: Option<&dyn TemplateSource>,
    ) -> MemoriesResult<Option<AssetId>> {
        let Some(source) = templates else {
            tracing::warn!(template = name, "no template source; drawing plain background");
            return Ok(None);
        };
        let Some(bytes) = source.template_bytes(name)? else {
            tracing::warn!(template = name, "unknown background template; drawing plain background");
            return Ok(None);
        };
        let asset = match bytes.prepare()? {
            PreparedTemplate::Raster(img) => PreparedAsset::Image(img),
            PreparedTemplate::Svg(svg) => PreparedAsset::Svg(svg),
        };
        Ok(Some(self.insert(asset)))
    }
}

/// Backend-agnostic draw list for one flattened page.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub width: u32,
    pub height: u32,
    /// Straight-alpha color the whole canvas is cleared to.
    pub clear: Rgba8,
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill `rect` (local space) with a solid straight-alpha color.
    FillRect {
        rect: Rect,
        transform: Affine,
        color: Rgba8,
    },
    /// Fill `rect` (local space) with an image; `paint_transform` maps image
    /// pixels into local space. Pixels outside `rect` are not drawn.
    Image {
        asset: AssetId,
        rect: Rect,
        transform: Affine,
        paint_transform: Affine,
    },
    /// Same as `Image`, for an SVG rasterized at draw scale.
    Svg {
        asset: AssetId,
        rect: Rect,
        transform: Affine,
        paint_transform: Affine,
    },
    /// Draw shaped text whose layout origin sits at local `(0, 0)`.
    Text { asset: AssetId, transform: Affine },
}

/// Scale-and-offset that makes `content` cover `frame` while keeping its
/// aspect ratio, centered; overflow is cropped by the frame.
pub fn aspect_fill(content: Size, frame: Size) -> Affine {
    let scale = (frame.width / content.width).max(frame.height / content.height);
    let offset = Vec2::new(
        (frame.width - content.width * scale) / 2.0,
        (frame.height - content.height * scale) / 2.0,
    );
    Affine::translate(offset) * Affine::scale(scale)
}

/// Compile a page into draw operations for a `width x height` canvas placed
/// with `fit`.
///
/// Layers bottom to top: background, rich-text body, items in z-order, ink.
pub fn compile_page(
    doc: &PageDocument,
    prepared: &PreparedPage,
    fit: ViewportFit,
    width: u32,
    height: u32,
) -> MemoriesResult<RenderPlan> {
    let page_to_screen = fit.page_to_screen();
    let page = page_rect();
    let mut ops = Vec::new();

    ops.push(DrawOp::FillRect {
        rect: page,
        transform: page_to_screen,
        color: doc.active_background().base_color(),
    });

    if let Some(asset) = prepared.background {
        ops.push(fill_op(prepared, asset, page, page_to_screen)?);
    }

    if let Some(asset) = prepared.body {
        ops.push(DrawOp::Text {
            asset,
            transform: page_to_screen * Affine::translate((BODY_INSET, BODY_INSET)),
        });
    }

    for item in doc.items() {
        let Some(&asset) = prepared.items.get(&item.id) else {
            continue;
        };
        let local = Rect::from_origin_size((0.0, 0.0), item.frame.size);
        let transform = page_to_screen * item.to_affine();
        match prepared.get(asset)? {
            PreparedAsset::Text(text) => {
                let dy = (item.frame.height() - f64::from(text.height())) / 2.0;
                ops.push(DrawOp::Text {
                    asset,
                    transform: transform * Affine::translate((0.0, dy)),
                });
            }
            _ => {
                if local.width() > 0.0 && local.height() > 0.0 {
                    ops.push(fill_op(prepared, asset, local, transform)?);
                }
            }
        }
    }

    if let Some(asset) = prepared.ink {
        let PreparedAsset::Image(img) = prepared.get(asset)? else {
            return Err(MemoriesError::flatten("ink layer is not an image"));
        };
        let stretch = Affine::scale_non_uniform(
            PAGE_SIZE.width / f64::from(img.width),
            PAGE_SIZE.height / f64::from(img.height),
        );
        ops.push(DrawOp::Image {
            asset,
            rect: page,
            transform: page_to_screen,
            paint_transform: stretch,
        });
    }

    Ok(RenderPlan {
        width,
        height,
        clear: Rgba8::WHITE,
        ops,
    })
}

fn fill_op(
    prepared: &PreparedPage,
    asset: AssetId,
    rect: Rect,
    transform: Affine,
) -> MemoriesResult<DrawOp> {
    let place = Affine::translate(rect.origin().to_vec2());
    match prepared.get(asset)? {
        PreparedAsset::Image(img) => Ok(DrawOp::Image {
            asset,
            rect,
            transform,
            paint_transform: place * aspect_fill(img.size(), rect.size()),
        }),
        PreparedAsset::Svg(svg) => Ok(DrawOp::Svg {
            asset,
            rect,
            transform,
            paint_transform: place * aspect_fill(svg.size(), rect.size()),
        }),
        PreparedAsset::Text(_) => Err(MemoriesError::flatten(format!(
            "asset {asset:?} is text, not an image"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
