use crate::document::Frame;
use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::foundation::math::rotate_vec2;

/// Smallest width or height, in page units, an item can be resized to.
pub const MIN_ITEM_SIZE: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeOutcome {
    /// Unrotated frame centered on `center`.
    pub frame: Frame,
    pub center: Point,
}

/// Aspect-locked resize driven by a drag measured in the item's local
/// (rotated) space.
///
/// The larger drag axis drives the new width; height follows the aspect ratio
/// of `initial`. Neither side drops below [`MIN_ITEM_SIZE`]. The center moves by
/// half the size change rotated by `rotation`, which keeps the unrotated
/// top-left corner fixed on the page.
pub fn resize_maintaining_aspect(
    initial: Frame,
    rotation: f64,
    drag_local: Vec2,
) -> MemoriesResult<ResizeOutcome> {
    let Size { width, height } = initial.size;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(MemoriesError::validation(format!(
            "cannot resize a {width}x{height} frame"
        )));
    }
    if !(rotation.is_finite() && drag_local.is_finite()) {
        return Err(MemoriesError::validation("resize input must be finite"));
    }

    let aspect = width / height;
    // Wide items hit the floor on their height first.
    let min_width = MIN_ITEM_SIZE.max(MIN_ITEM_SIZE * aspect);
    let delta = drag_local.x.max(drag_local.y);
    let new_width = min_width.max(width + delta);
    let new_height = new_width / aspect;

    let grow = Vec2::new((new_width - width) / 2.0, (new_height - height) / 2.0);
    let center = initial.center() + rotate_vec2(grow, rotation);
    Ok(ResizeOutcome {
        frame: Frame::from_center_size(center, Size::new(new_width, new_height)),
        center,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/transform/resize.rs"]
mod tests;
