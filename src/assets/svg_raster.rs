use crate::foundation::core::Affine;
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// Largest raster edge produced for an SVG template.
const MAX_DIM: u32 = 16_384;

/// Pixel size at which to rasterize an SVG drawn with `transform`.
///
/// Returns `(width, height, pixel_to_svg)`: rasterize into `width x height`,
/// then place the pixels with `pixel_to_svg` applied before the original
/// transform. Rasterizing at the drawn scale keeps upscaled templates sharp.
pub fn svg_raster_params(tree: &usvg::Tree, transform: Affine) -> MemoriesResult<(u32, u32, Affine)> {
    fn to_px(v: f32) -> MemoriesResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(MemoriesError::flatten("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let [a, b, c, d, _e, _f] = transform.as_coeffs();
    let sx = (a * a + b * b).sqrt().max(1e-6);
    let sy = (c * c + d * d).sqrt().max(1e-6);

    let w = (f64::from(base_w) * sx).ceil().max(1.0) as u32;
    let h = (f64::from(base_h) * sy).ceil().max(1.0) as u32;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(MemoriesError::flatten(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    Ok((w, h, Affine::scale_non_uniform(1.0 / sx, 1.0 / sy)))
}

/// Render `tree` stretched to `width x height`; output is premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> MemoriesResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MemoriesError::flatten("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
