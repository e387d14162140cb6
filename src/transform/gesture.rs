use crate::document::{CanvasItem, Frame, ItemId};
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::MemoriesResult;
use crate::foundation::math::rotate_vec2;
use crate::transform::resize::resize_maintaining_aspect;

/// New placement for an item, ready to hand to the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureUpdate {
    pub id: ItemId,
    pub frame: Frame,
    pub rotation: f64,
}

/// Snapshot of an item's placement taken when a gesture starts.
///
/// Every update is computed from the snapshot and the gesture's total
/// translation so far, so a long drag never accumulates rounding drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemGesture {
    id: ItemId,
    initial_frame: Frame,
    initial_rotation: f64,
}

impl ItemGesture {
    pub fn begin(item: &CanvasItem) -> Self {
        Self {
            id: item.id,
            initial_frame: item.frame,
            initial_rotation: item.rotation,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.id
    }

    pub fn initial_frame(&self) -> Frame {
        self.initial_frame
    }

    pub fn initial_rotation(&self) -> f64 {
        self.initial_rotation
    }

    /// Move by a page-space translation.
    pub fn translate(&self, delta: Vec2) -> GestureUpdate {
        self.update(self.initial_frame.translated(delta), self.initial_rotation)
    }

    /// Rotate about the frame center by `angle_delta` radians.
    pub fn rotate(&self, angle_delta: f64) -> GestureUpdate {
        self.update(self.initial_frame, self.initial_rotation + angle_delta)
    }

    /// Rotate by the angle swept around the frame center while dragging from
    /// `start` to `current` (both in page space).
    pub fn rotate_by_drag(&self, start: Point, current: Point) -> GestureUpdate {
        let c = self.initial_frame.center();
        let a0 = (start - c).atan2();
        let a1 = (current - c).atan2();
        self.rotate(a1 - a0)
    }

    /// Aspect-locked resize from a drag already expressed in item-local space.
    pub fn resize(&self, drag_local: Vec2) -> MemoriesResult<GestureUpdate> {
        let out =
            resize_maintaining_aspect(self.initial_frame, self.initial_rotation, drag_local)?;
        Ok(self.update(out.frame, self.initial_rotation))
    }

    /// Aspect-locked resize from a page-space drag of a corner handle.
    pub fn resize_by_page_drag(&self, drag: Vec2) -> MemoriesResult<GestureUpdate> {
        self.resize(rotate_vec2(drag, -self.initial_rotation))
    }

    fn update(&self, frame: Frame, rotation: f64) -> GestureUpdate {
        GestureUpdate {
            id: self.id,
            frame,
            rotation,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/gesture.rs"]
mod tests;
