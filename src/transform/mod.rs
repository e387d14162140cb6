//! Coordinate and transform engine.
//!
//! Reconciles the fixed virtual page with a variable on-screen viewport and
//! implements the rotation-aware gestures used to place items on a page.

pub mod gesture;
pub mod resize;
pub mod viewport;

pub use gesture::{GestureUpdate, ItemGesture};
pub use resize::{MIN_ITEM_SIZE, ResizeOutcome, resize_maintaining_aspect};
pub use viewport::{DEFAULT_VIEWPORT_PADDING, ViewportFit, fit_to_viewport};
