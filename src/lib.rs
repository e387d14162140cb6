//! Memories is the editing core of a scrapbook app: pages of images and rich
//! text laid out on a fixed 1000x1400 virtual canvas.
//!
//! - Load a [`PageDocument`] into a [`Session`] with its [`Collaborators`]
//! - Place, rotate, and resize items; style the page-wide rich-text body
//! - Flatten the page into one JPEG/PNG and send it as a [`Letter`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod document;
pub mod editor;
pub mod foundation;
pub mod render;
pub mod store;
pub mod transform;

pub use crate::foundation::core::{
    Affine, Insets, PAGE_HEIGHT, PAGE_SIZE, PAGE_WIDTH, Point, Rect, Rgba8, Size, Vec2,
};
pub use crate::foundation::error::{MemoriesError, MemoriesResult};

pub use crate::assets::{DirTemplateSource, TemplateSource};
pub use crate::config::EditorConfig;
pub use crate::document::{
    Background, CanvasItem, FontSpec, Frame, ItemContent, ItemId, PageDocument, PageId, RichText,
    TextStyle,
};
pub use crate::editor::{
    Collaborators, Letter, LetterId, LetterTransport, PageChange, PageStore, PendingImage,
    Session, SessionMode, UserId, load_session,
};
pub use crate::render::{
    FlattenSettings, FontLibrary, InkRasterizer, OutputFormat, RenderResources, flatten_page,
    render_page,
};
pub use crate::store::{FsPageStore, InMemoryPageStore, OutboxTransport};
pub use crate::transform::{ItemGesture, ViewportFit, fit_to_viewport, resize_maintaining_aspect};
