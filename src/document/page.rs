use std::{collections::HashSet, fmt};

use crate::{
    document::item::{CanvasItem, Frame, ItemContent, ItemId},
    document::rich_text::RichText,
    document::wire,
    foundation::core::{Point, Rgba8},
    foundation::error::{MemoriesError, MemoriesResult},
};

/// Immutable identifier of a [`PageDocument`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PageId(pub uuid::Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PageId {
    type Err = MemoriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| MemoriesError::validation(format!("invalid page id '{s}': {e}")))
    }
}

/// The background that is displayed for a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Background {
    /// Plain page; renders white.
    None,
    Color(Rgba8),
    /// Named background template asset.
    Image(String),
}

impl Background {
    /// Color used to clear the page before anything else is drawn.
    pub fn base_color(&self) -> Rgba8 {
        match self {
            Self::Color(c) => *c,
            Self::None | Self::Image(_) => Rgba8::WHITE,
        }
    }
}

/// Persisted state of one canvas page.
///
/// `items` are in z-order: the last item is drawn on top. Both background
/// fields may be stored at once; [`PageDocument::active_background`] decides
/// which one is displayed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    id: PageId,
    #[serde(default, with = "wire::base64_bytes")]
    drawing_data: Vec<u8>,
    #[serde(default)]
    items: Vec<CanvasItem>,
    #[serde(default)]
    body_text: String,
    #[serde(
        default,
        with = "wire::base64_bytes_opt",
        skip_serializing_if = "Option::is_none"
    )]
    attributed_body_text: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_color: Option<Rgba8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_image_name: Option<String>,
}

impl Default for PageDocument {
    fn default() -> Self {
        Self::create_empty()
    }
}

impl PageDocument {
    /// New page with a fresh id, no items, no ink, and the default white background.
    pub fn create_empty() -> Self {
        Self {
            id: PageId::new(),
            drawing_data: Vec::new(),
            items: Vec::new(),
            body_text: String::new(),
            attributed_body_text: None,
            background_color: None,
            background_image_name: None,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Opaque ink blob owned by the drawing engine.
    pub fn drawing_data(&self) -> &[u8] {
        &self.drawing_data
    }

    pub fn set_drawing_data(&mut self, bytes: Vec<u8>) {
        self.drawing_data = bytes;
    }

    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&CanvasItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_index(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Plain-text mirror of the rich body, kept for search and indexing.
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Serialized rich body; authoritative for rendering.
    pub fn attributed_body_text(&self) -> Option<&[u8]> {
        self.attributed_body_text.as_deref()
    }

    /// Callers must keep this in sync with [`PageDocument::set_attributed_body_text`].
    pub fn set_body_text(&mut self, text: impl Into<String>) {
        self.body_text = text.into();
    }

    pub fn set_attributed_body_text(&mut self, rich: Option<Vec<u8>>) {
        self.attributed_body_text = rich;
    }

    /// Decode the rich body, if one is stored.
    pub fn rich_body(&self) -> MemoriesResult<Option<RichText>> {
        self.attributed_body_text
            .as_deref()
            .map(RichText::from_bytes)
            .transpose()
    }

    pub fn background_color(&self) -> Option<Rgba8> {
        self.background_color
    }

    pub fn background_image_name(&self) -> Option<&str> {
        self.background_image_name.as_deref()
    }

    /// Does not clear the template name; see [`PageDocument::active_background`].
    pub fn set_background_color(&mut self, color: Option<Rgba8>) {
        self.background_color = color;
    }

    /// Does not clear the color; a template name takes precedence when displayed.
    pub fn set_background_image(&mut self, name: Option<String>) {
        self.background_image_name = name;
    }

    /// The background that is displayed: template image, else color, else none.
    pub fn active_background(&self) -> Background {
        if let Some(name) = &self.background_image_name {
            return Background::Image(name.clone());
        }
        match self.background_color {
            Some(c) => Background::Color(c),
            None => Background::None,
        }
    }

    /// Append an item on top of the z-order.
    pub fn push_item(&mut self, item: CanvasItem) -> MemoriesResult<()> {
        item.validate()?;
        if self.item(item.id).is_some() {
            return Err(MemoriesError::validation(format!(
                "item {} is already on the page",
                item.id
            )));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn update_item_transform(
        &mut self,
        id: ItemId,
        frame: Frame,
        rotation: f64,
    ) -> MemoriesResult<()> {
        frame.validate()?;
        if !rotation.is_finite() {
            return Err(MemoriesError::validation("rotation must be finite"));
        }
        let item = self.item_mut(id)?;
        item.frame = frame;
        item.rotation = rotation;
        Ok(())
    }

    /// Remove the item with `id`. Returns whether anything was removed; an absent
    /// id leaves the page untouched.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Move an item to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ItemId) -> MemoriesResult<()> {
        let idx = self.item_index(id).ok_or(MemoriesError::NotFound(id))?;
        let item = self.items.remove(idx);
        self.items.push(item);
        Ok(())
    }

    /// Replace the text of a legacy floating text item.
    pub fn update_text_content(&mut self, id: ItemId, text: impl Into<String>) -> MemoriesResult<()> {
        let item = self.item_mut(id)?;
        match &mut item.content {
            ItemContent::Text(t) => {
                *t = text.into();
                Ok(())
            }
            ItemContent::Image(_) => Err(MemoriesError::validation(format!(
                "item {id} is an image and has no text"
            ))),
        }
    }

    /// Topmost item whose rotated frame contains `point`.
    pub fn item_at(&self, point: Point) -> Option<&CanvasItem> {
        self.items.iter().rev().find(|i| i.contains(point))
    }

    pub fn validate(&self) -> MemoriesResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            item.validate()?;
            if !seen.insert(item.id) {
                return Err(MemoriesError::validation(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_bytes(&self) -> MemoriesResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> MemoriesResult<Self> {
        let doc: Self = serde_json::from_slice(bytes)?;
        doc.validate()?;
        Ok(doc)
    }

    fn item_mut(&mut self, id: ItemId) -> MemoriesResult<&mut CanvasItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(MemoriesError::NotFound(id))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/page.rs"]
mod tests;
