use crate::foundation::core::{
    Affine, Insets, PAGE_HEIGHT, PAGE_SIZE, PAGE_WIDTH, Point, Rect, Size, Vec2,
};
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// Padding kept between the page and each viewport edge by the editor.
pub const DEFAULT_VIEWPORT_PADDING: f64 = 20.0;

/// Uniform scale and offset placing the virtual page inside a viewport.
///
/// Screen coordinates are `page * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFit {
    pub scale: f64,
    pub offset: Vec2,
}

impl ViewportFit {
    /// Identity fit: one screen unit per page unit, page at the origin.
    pub const NATIVE: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    pub fn page_to_screen(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    pub fn screen_to_page(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    pub fn to_screen(&self, p: Point) -> Point {
        self.page_to_screen() * p
    }

    pub fn to_page(&self, p: Point) -> Point {
        self.screen_to_page() * p
    }

    /// A screen-space drag converted to page units.
    pub fn delta_to_page(&self, d: Vec2) -> Vec2 {
        d / self.scale
    }

    /// Where the page lands on screen.
    pub fn page_rect_on_screen(&self) -> Rect {
        Rect::from_origin_size(
            self.offset.to_point(),
            Size::new(PAGE_WIDTH * self.scale, PAGE_HEIGHT * self.scale),
        )
    }
}

/// Largest uniform scale fitting the page into `viewport`, minus `padding` on
/// every side and the vertical safe-area `insets`, centered in the viewport.
///
/// Call again whenever the viewport size changes.
pub fn fit_to_viewport(viewport: Size, padding: f64, insets: Insets) -> MemoriesResult<ViewportFit> {
    let inputs = [viewport.width, viewport.height, padding, insets.top, insets.bottom];
    if inputs.iter().any(|v| !v.is_finite()) {
        return Err(MemoriesError::validation("viewport geometry must be finite"));
    }
    let available_w = viewport.width - 2.0 * padding;
    let available_h = viewport.height - 2.0 * padding - insets.top - insets.bottom;
    let scale = (available_w / PAGE_SIZE.width).min(available_h / PAGE_SIZE.height);
    if !(scale.is_finite() && scale > 0.0) {
        return Err(MemoriesError::validation(format!(
            "viewport {}x{} leaves no room for the page",
            viewport.width, viewport.height
        )));
    }

    let view_center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
    let half_page = Vec2::new(PAGE_WIDTH / 2.0, PAGE_HEIGHT / 2.0) * scale;
    Ok(ViewportFit {
        scale,
        offset: view_center - half_page,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/transform/viewport.rs"]
mod tests;
