//! Page document model: the persisted state of one canvas page.

pub mod item;
pub mod page;
pub mod rich_text;
pub(crate) mod wire;

pub use item::{CanvasItem, DEFAULT_IMAGE_WIDTH, Frame, ItemContent, ItemId, ItemKind};
pub use page::{Background, PageDocument, PageId};
pub use rich_text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontSpec, MAX_FONT_SIZE, MIN_FONT_SIZE, RichText,
    StyleRun, TextStyle,
};
