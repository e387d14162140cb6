use std::fmt;

use crate::{
    document::wire,
    foundation::core::{Affine, Point, Rect, Size, Vec2},
    foundation::error::{MemoriesError, MemoriesResult},
};

/// Display width, in page units, given to a freshly inserted image.
pub const DEFAULT_IMAGE_WIDTH: f64 = 250.0;

/// Stable identifier of a [`CanvasItem`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub uuid::Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = MemoriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| MemoriesError::validation(format!("invalid item id '{s}': {e}")))
    }
}

/// Unrotated item rectangle in page space: origin plus size.
///
/// Kept as origin/size rather than corner points so that persisted values
/// round-trip exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub origin: Point,
    pub size: Size,
}

impl Frame {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn from_center_size(center: Point, size: Size) -> Self {
        Self {
            origin: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
        }
    }

    pub fn center(self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn width(self) -> f64 {
        self.size.width
    }

    pub fn height(self) -> f64 {
        self.size.height
    }

    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            origin: self.origin + delta,
            size: self.size,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    pub(crate) fn validate(self) -> MemoriesResult<()> {
        let finite = [
            self.origin.x,
            self.origin.y,
            self.size.width,
            self.size.height,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(MemoriesError::validation("item frame must be finite"));
        }
        if self.size.width < 0.0 || self.size.height < 0.0 {
            return Err(MemoriesError::validation(
                "item frame size must be non-negative",
            ));
        }
        Ok(())
    }
}

impl From<Rect> for Frame {
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.origin(), r.size())
    }
}

/// Payload of a canvas item.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemContent {
    /// Encoded image bytes (PNG, JPEG, ...).
    Image(Vec<u8>),
    /// Floating text box. Legacy: pages now carry a page-wide rich-text body.
    Text(String),
}

/// Wire tag of an item's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Image,
    Text,
}

/// A single positioned element on a page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CanvasItemWire", into = "CanvasItemWire")]
pub struct CanvasItem {
    pub id: ItemId,
    pub frame: Frame,
    /// Radians, applied about the frame center.
    pub rotation: f64,
    pub content: ItemContent,
}

impl CanvasItem {
    /// Build an image item sized to [`DEFAULT_IMAGE_WIDTH`] with the image's aspect
    /// ratio, centered on `center`.
    ///
    /// `natural_size` is the decoded pixel size of `bytes`; a size that is not finite
    /// and positive means the image could not be decoded.
    pub fn image(bytes: Vec<u8>, natural_size: Size, center: Point) -> MemoriesResult<Self> {
        if bytes.is_empty() {
            return Err(MemoriesError::decode("image bytes are empty"));
        }
        let Size { width, height } = natural_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MemoriesError::decode(format!(
                "image natural size {width}x{height} is not usable"
            )));
        }
        if !(center.x.is_finite() && center.y.is_finite()) {
            return Err(MemoriesError::validation("insert point must be finite"));
        }

        let size = Size::new(DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_WIDTH * (height / width));
        Ok(Self {
            id: ItemId::new(),
            frame: Frame::from_center_size(center, size),
            rotation: 0.0,
            content: ItemContent::Image(bytes),
        })
    }

    pub fn kind(&self) -> ItemKind {
        match self.content {
            ItemContent::Image(_) => ItemKind::Image,
            ItemContent::Text(_) => ItemKind::Text,
        }
    }

    pub fn image_data(&self) -> Option<&[u8]> {
        match &self.content {
            ItemContent::Image(b) => Some(b),
            ItemContent::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            ItemContent::Text(t) => Some(t),
            ItemContent::Image(_) => None,
        }
    }

    pub fn center(&self) -> Point {
        self.frame.center()
    }

    /// Map item-local coordinates (origin at the unrotated top-left corner) into
    /// page space.
    pub fn to_affine(&self) -> Affine {
        let half = Vec2::new(self.frame.width() / 2.0, self.frame.height() / 2.0);
        Affine::translate(self.center().to_vec2()) * Affine::rotate(self.rotation)
            * Affine::translate(-half)
    }

    /// Whether a page-space point falls inside the rotated frame.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.to_affine().inverse() * point;
        local.x >= 0.0
            && local.y >= 0.0
            && local.x <= self.frame.width()
            && local.y <= self.frame.height()
    }

    pub(crate) fn validate(&self) -> MemoriesResult<()> {
        self.frame.validate()?;
        if !self.rotation.is_finite() {
            return Err(MemoriesError::validation(format!(
                "item {} rotation must be finite",
                self.id
            )));
        }
        Ok(())
    }
}

/// Persisted item layout: a type tag with optional payload fields.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasItemWire {
    id: ItemId,
    #[serde(with = "wire::frame")]
    frame: Frame,
    rotation: f64,
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(
        default,
        with = "wire::base64_bytes_opt",
        skip_serializing_if = "Option::is_none"
    )]
    image_data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,
}

impl TryFrom<CanvasItemWire> for CanvasItem {
    type Error = MemoriesError;

    fn try_from(w: CanvasItemWire) -> Result<Self, Self::Error> {
        let content = match (w.kind, w.image_data, w.text_content) {
            (ItemKind::Image, Some(bytes), None) => ItemContent::Image(bytes),
            (ItemKind::Text, None, text) => {
                tracing::warn!(item = %w.id, "decoding legacy floating text item");
                ItemContent::Text(text.unwrap_or_default())
            }
            (ItemKind::Image, None, _) => {
                return Err(MemoriesError::validation(format!(
                    "image item {} has no imageData",
                    w.id
                )));
            }
            (kind, _, _) => {
                return Err(MemoriesError::validation(format!(
                    "{kind:?} item {} carries a payload of the wrong type",
                    w.id
                )));
            }
        };
        Ok(Self {
            id: w.id,
            frame: w.frame,
            rotation: w.rotation,
            content,
        })
    }
}

impl From<CanvasItem> for CanvasItemWire {
    fn from(item: CanvasItem) -> Self {
        let kind = item.kind();
        let (image_data, text_content) = match item.content {
            ItemContent::Image(b) => (Some(b), None),
            ItemContent::Text(t) => (None, Some(t)),
        };
        Self {
            id: item.id,
            frame: item.frame,
            rotation: item.rotation,
            kind,
            image_data,
            text_content,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/item.rs"]
mod tests;
