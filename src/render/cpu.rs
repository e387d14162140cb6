use std::{collections::HashMap, sync::Arc};

use crate::assets::svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_params};
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::render::FrameRGBA;
use crate::render::plan::{AssetId, DrawOp, PreparedAsset, PreparedPage, RenderPlan};
use crate::render::text::{FontFace, PreparedText};

/// Executes a [`RenderPlan`] on the CPU with `vello_cpu`.
#[derive(Default)]
pub struct CpuBackend {
    image_cache: HashMap<AssetId, vello_cpu::Image>,
    font_cache: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `plan` and read back premultiplied RGBA8.
    pub fn execute(
        &mut self,
        plan: &RenderPlan,
        assets: &PreparedPage,
    ) -> MemoriesResult<FrameRGBA> {
        let width: u16 = plan
            .width
            .try_into()
            .map_err(|_| MemoriesError::flatten("canvas width exceeds u16"))?;
        let height: u16 = plan
            .height
            .try_into()
            .map_err(|_| MemoriesError::flatten("canvas height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        // The scene replaces pixmap contents, so the clear is drawn as its first fill.
        self.draw_op(
            &mut ctx,
            &DrawOp::FillRect {
                rect: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
                transform: Affine::IDENTITY,
                color: plan.clear,
            },
            assets,
        )?;
        for op in &plan.ops {
            self.draw_op(&mut ctx, op, assets)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.width,
            height: plan.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        assets: &PreparedPage,
    ) -> MemoriesResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillRect {
                rect,
                transform,
                color,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    color.r, color.g, color.b, color.a,
                ));
                ctx.fill_rect(&rect_to_cpu(*rect));
                Ok(())
            }
            DrawOp::Image {
                asset,
                rect,
                transform,
                paint_transform,
            } => {
                let paint = self.image_paint_for(*asset, assets)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.set_paint_transform(affine_to_cpu(*paint_transform));
                ctx.fill_rect(&rect_to_cpu(*rect));
                Ok(())
            }
            DrawOp::Svg {
                asset,
                rect,
                transform,
                paint_transform,
            } => {
                let PreparedAsset::Svg(svg) = assets.get(*asset)? else {
                    return Err(MemoriesError::flatten("AssetId is not a PreparedSvg"));
                };
                let (w, h, pixel_to_svg) =
                    svg_raster_params(&svg.tree, *transform * *paint_transform)?;
                let rgba8_premul = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
                let paint = image_paint(premul_bytes_to_pixmap(&rgba8_premul, w, h)?);

                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.set_paint_transform(affine_to_cpu(*paint_transform * pixel_to_svg));
                ctx.fill_rect(&rect_to_cpu(*rect));
                Ok(())
            }
            DrawOp::Text { asset, transform } => {
                let PreparedAsset::Text(text) = assets.get(*asset)? else {
                    return Err(MemoriesError::flatten("AssetId is not a PreparedText"));
                };
                ctx.set_transform(affine_to_cpu(*transform));
                self.draw_text(ctx, text)
            }
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &PreparedText,
    ) -> MemoriesResult<()> {
        for line in text.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let font_ref = run.run().font();
                let font = self.font_for(&text.faces, font_ref.data.id(), font_ref.index)?;

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn font_for(
        &mut self,
        faces: &[FontFace],
        blob_id: u64,
        index: u32,
    ) -> MemoriesResult<vello_cpu::peniko::FontData> {
        if let Some(font) = self.font_cache.get(&(blob_id, index)) {
            return Ok(font.clone());
        }
        let face = faces
            .iter()
            .find(|f| f.blob_id == blob_id)
            .ok_or_else(|| MemoriesError::flatten("glyph run references an unregistered font"))?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
            index,
        );
        self.font_cache.insert((blob_id, index), font.clone());
        Ok(font)
    }

    fn image_paint_for(
        &mut self,
        id: AssetId,
        assets: &PreparedPage,
    ) -> MemoriesResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&id) {
            return Ok(paint.clone());
        }

        let PreparedAsset::Image(img) = assets.get(id)? else {
            return Err(MemoriesError::flatten("AssetId is not a PreparedImage"));
        };
        let pixmap = premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        let paint = image_paint(pixmap);
        self.image_cache.insert(id, paint.clone());
        Ok(paint)
    }
}

fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MemoriesResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MemoriesError::flatten("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MemoriesError::flatten("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MemoriesError::flatten("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
