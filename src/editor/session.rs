use std::ops::Range;

use crate::document::{
    Background, CanvasItem, Frame, ItemId, PageDocument, RichText, TextStyle, FontSpec,
};
use crate::editor::collab::{Collaborators, Letter, OutgoingLetter, UserId};
use crate::editor::events::{Listeners, PageChange, SubscriptionId};
use crate::editor::pending::PendingImage;
use crate::foundation::core::{Point, Rgba8, Size};
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::render::{FlattenSettings, FontLibrary, RenderResources, flatten_page};
use crate::transform::{GestureUpdate, ItemGesture};

/// What the page being edited is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// A page of a shared memory book.
    Memory,
    /// A one-off letter, flattened and sent to `recipient`.
    Letter { sender: UserId, recipient: UserId },
}

/// Bind `document` for editing.
///
/// The stored rich body is decoded up front; a page that only has a plain
/// `bodyText` gets a default-styled rich body built from it.
pub fn load_session(
    document: PageDocument,
    collaborators: Collaborators,
) -> MemoriesResult<Session> {
    document.validate()?;
    let rich = match document.rich_body()? {
        Some(rich) => rich,
        None => RichText::plain(document.body_text(), TextStyle::default()),
    };
    tracing::debug!(page = %document.id(), items = document.items().len(), "session loaded");
    Ok(Session {
        doc: document,
        rich,
        typing: TextStyle::default(),
        mode: SessionMode::Memory,
        collaborators,
        fonts: FontLibrary::new(),
        flatten: FlattenSettings::default(),
        listeners: Listeners::default(),
        token: uuid::Uuid::new_v4(),
        generation: 0,
        dirty: false,
    })
}

/// Sole owner of a page document while it is being edited.
///
/// Every mutating call notifies subscribers after the document changed.
#[derive(Debug)]
pub struct Session {
    doc: PageDocument,
    rich: RichText,
    typing: TextStyle,
    mode: SessionMode,
    collaborators: Collaborators,
    fonts: FontLibrary,
    flatten: FlattenSettings,
    listeners: Listeners,
    /// Identifies this session to its background decodes.
    token: uuid::Uuid,
    generation: u64,
    dirty: bool,
}

impl Session {
    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_flatten_settings(mut self, settings: FlattenSettings) -> Self {
        self.flatten = settings;
        self
    }

    pub fn document(&self) -> &PageDocument {
        &self.doc
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn rich_text(&self) -> &RichText {
        &self.rich
    }

    /// Style given to characters typed next.
    pub fn typing_attributes(&self) -> &TextStyle {
        &self.typing
    }

    /// Whether there are changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&PageChange, &PageDocument) + Send + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Insert an image sized from its natural size and centered on `center`.
    ///
    /// Nothing is inserted when the size is unusable.
    #[tracing::instrument(skip(self, bytes), fields(page = %self.doc.id(), bytes = bytes.len()))]
    pub fn add_image(
        &mut self,
        bytes: Vec<u8>,
        natural_size: Size,
        center: Point,
    ) -> MemoriesResult<ItemId> {
        let item = CanvasItem::image(bytes, natural_size, center)?;
        let id = item.id;
        self.doc.push_item(item)?;
        tracing::debug!(item = %id, "image added");
        self.changed(PageChange::ItemAdded(id));
        Ok(id)
    }

    /// [`Session::add_image`] reading the natural size from the image header.
    pub fn add_image_bytes(&mut self, bytes: Vec<u8>, center: Point) -> MemoriesResult<ItemId> {
        let natural_size = crate::assets::read_image_size(&bytes)?;
        self.add_image(bytes, natural_size, center)
    }

    /// Size `bytes` off the interactive thread.
    ///
    /// Starting another decode makes this one stale; stale results are dropped
    /// by [`Session::finish_pending_image`].
    pub fn decode_image_in_background(&mut self, bytes: Vec<u8>, center: Point) -> PendingImage {
        self.generation += 1;
        PendingImage::spawn(self.token, self.generation, bytes, center)
    }

    /// Apply a background decode if it was started by this session and is
    /// still the latest one started.
    ///
    /// Returns `Ok(None)` for a stale or foreign result.
    pub fn finish_pending_image(
        &mut self,
        pending: PendingImage,
    ) -> MemoriesResult<Option<ItemId>> {
        if pending.session() != self.token {
            tracing::warn!(page = %self.doc.id(), "discarding image decode from another session");
            return Ok(None);
        }
        if pending.generation() != self.generation {
            tracing::warn!(
                stale = pending.generation(),
                current = self.generation,
                "discarding stale image decode"
            );
            return Ok(None);
        }
        let center = pending.center();
        let decoded = pending.wait()?;
        self.add_image(decoded.bytes, decoded.natural_size, center)
            .map(Some)
    }

    #[tracing::instrument(skip(self), fields(page = %self.doc.id()))]
    pub fn update_item_transform(
        &mut self,
        id: ItemId,
        frame: Frame,
        rotation: f64,
    ) -> MemoriesResult<()> {
        self.doc.update_item_transform(id, frame, rotation)?;
        self.changed(PageChange::ItemTransformed(id));
        Ok(())
    }

    /// Snapshot an item's placement at gesture start.
    pub fn begin_gesture(&self, id: ItemId) -> MemoriesResult<ItemGesture> {
        self.doc
            .item(id)
            .map(ItemGesture::begin)
            .ok_or(MemoriesError::NotFound(id))
    }

    pub fn apply_gesture(&mut self, update: GestureUpdate) -> MemoriesResult<()> {
        self.update_item_transform(update.id, update.frame, update.rotation)
    }

    /// Remove an item. Absent ids are ignored and do not notify.
    #[tracing::instrument(skip(self), fields(page = %self.doc.id()))]
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let removed = self.doc.remove_item(id);
        if removed {
            tracing::debug!(item = %id, "item removed");
            self.changed(PageChange::ItemRemoved(id));
        }
        removed
    }

    pub fn bring_to_front(&mut self, id: ItemId) -> MemoriesResult<()> {
        self.doc.bring_to_front(id)?;
        self.changed(PageChange::ItemRaised(id));
        Ok(())
    }

    /// Tap handling: raise and return the topmost item under `point`.
    pub fn select_item_at(&mut self, point: Point) -> MemoriesResult<Option<ItemId>> {
        let Some(id) = self.doc.item_at(point).map(|i| i.id) else {
            return Ok(None);
        };
        self.bring_to_front(id)?;
        Ok(Some(id))
    }

    /// Replace the text of a legacy floating text item.
    pub fn update_text_content(&mut self, id: ItemId, text: &str) -> MemoriesResult<()> {
        self.doc.update_text_content(id, text)?;
        self.changed(PageChange::ItemTextChanged(id));
        Ok(())
    }

    /// Style `range` of the body (if non-empty) and make the same style the
    /// typing attributes, so new text never inherits a neighbor's style.
    #[tracing::instrument(skip(self, font), fields(page = %self.doc.id()))]
    pub fn apply_text_style(
        &mut self,
        range: Range<usize>,
        font: FontSpec,
        color: Rgba8,
    ) -> MemoriesResult<()> {
        let style = TextStyle::new(font, color);
        if range.is_empty() {
            if range.start > self.rich.len() || !self.rich.text().is_char_boundary(range.start) {
                return Err(MemoriesError::validation(format!(
                    "cursor {} is outside the body text",
                    range.start
                )));
            }
        } else {
            self.rich.apply_style(range, &style)?;
            self.sync_body()?;
            self.changed(PageChange::BodyTextChanged);
        }
        self.typing = style;
        Ok(())
    }

    /// Insert body text at byte offset `at` using the typing attributes.
    pub fn insert_text(&mut self, at: usize, text: &str) -> MemoriesResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.rich.insert_text(at, text, self.typing.clone())?;
        self.sync_body()?;
        self.changed(PageChange::BodyTextChanged);
        Ok(())
    }

    pub fn delete_text(&mut self, range: Range<usize>) -> MemoriesResult<()> {
        if range.is_empty() {
            return Ok(());
        }
        self.rich.delete_range(range)?;
        self.sync_body()?;
        self.changed(PageChange::BodyTextChanged);
        Ok(())
    }

    /// Replace the background. Choosing a color clears the template name and
    /// choosing a template clears the color.
    #[tracing::instrument(skip(self), fields(page = %self.doc.id()))]
    pub fn set_background(&mut self, background: Background) -> MemoriesResult<()> {
        match background {
            Background::None => {
                self.doc.set_background_color(None);
                self.doc.set_background_image(None);
            }
            Background::Color(c) => {
                self.doc.set_background_color(Some(c));
                self.doc.set_background_image(None);
            }
            Background::Image(name) => {
                if name.trim().is_empty() {
                    return Err(MemoriesError::validation("background template name is empty"));
                }
                self.doc.set_background_image(Some(name));
                self.doc.set_background_color(None);
            }
        }
        self.changed(PageChange::BackgroundChanged);
        Ok(())
    }

    /// Store the drawing engine's ink blob.
    pub fn set_drawing(&mut self, bytes: Vec<u8>) {
        self.doc.set_drawing_data(bytes);
        self.changed(PageChange::DrawingChanged);
    }

    /// Composite the page into one encoded image of `bounds` pixels.
    pub fn flatten_to_image(&mut self, bounds: Size) -> MemoriesResult<Vec<u8>> {
        let resources = RenderResources {
            templates: self.collaborators.templates.as_deref(),
            ink: self.collaborators.ink.as_deref(),
        };
        flatten_page(&self.doc, bounds, &mut self.fonts, resources, &self.flatten)
    }

    /// Persist the document. On failure the session stays dirty and the
    /// error is returned; nothing is retried.
    #[tracing::instrument(skip(self), fields(page = %self.doc.id()))]
    pub fn save(&mut self) -> MemoriesResult<()> {
        self.collaborators
            .store
            .save_document(&self.doc)
            .map_err(|e| match e {
                MemoriesError::Persistence(_) => e,
                other => MemoriesError::persistence(other.to_string()),
            })?;
        self.dirty = false;
        tracing::info!("page saved");
        self.listeners.notify(&PageChange::Saved, &self.doc);
        Ok(())
    }

    /// Flatten the page and hand it to the letter transport.
    ///
    /// A flatten failure aborts before anything is transmitted.
    #[tracing::instrument(skip(self), fields(page = %self.doc.id()))]
    pub fn send_letter(&mut self, bounds: Size) -> MemoriesResult<Letter> {
        let SessionMode::Letter { sender, recipient } = self.mode else {
            return Err(MemoriesError::validation("only letter pages can be sent"));
        };
        self.listeners.notify(&PageChange::SendStarted, &self.doc);
        let result = self.transmit(sender, recipient, bounds);

        let letter = result.as_ref().ok().map(|l| l.id);
        self.listeners
            .notify(&PageChange::SendFinished { letter }, &self.doc);
        match &result {
            Ok(l) => tracing::info!(letter = %l.id, recipient = %recipient, "letter sent"),
            Err(e) => tracing::warn!(error = %e, "letter send failed"),
        }
        result
    }

    fn transmit(
        &mut self,
        sender: UserId,
        recipient: UserId,
        bounds: Size,
    ) -> MemoriesResult<Letter> {
        let image = self.flatten_to_image(bounds)?;
        let transport = self
            .collaborators
            .transport
            .as_deref()
            .ok_or_else(|| MemoriesError::transmission("no letter transport configured"))?;
        transport
            .send(OutgoingLetter {
                sender,
                recipient,
                image: &image,
                format: self.flatten.format,
            })
            .map_err(|e| match e {
                MemoriesError::Transmission(_) => e,
                other => MemoriesError::transmission(other.to_string()),
            })
    }

    /// End the session, handing the document back.
    pub fn close(self) -> PageDocument {
        if self.dirty {
            tracing::warn!(page = %self.doc.id(), "closing session with unsaved changes");
        }
        self.doc
    }

    fn sync_body(&mut self) -> MemoriesResult<()> {
        self.doc.set_body_text(self.rich.text());
        let rich = if self.rich.is_empty() {
            None
        } else {
            Some(self.rich.to_bytes()?)
        };
        self.doc.set_attributed_body_text(rich);
        Ok(())
    }

    fn changed(&mut self, change: PageChange) {
        self.dirty = true;
        self.listeners.notify(&change, &self.doc);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
