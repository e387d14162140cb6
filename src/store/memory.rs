use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::document::{PageDocument, PageId};
use crate::editor::PageStore;
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// Map-backed page store. Clones share the same pages.
///
/// Pages are kept in their serialized form so loads go through the same
/// decode path as the filesystem store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPageStore {
    pages: Arc<Mutex<HashMap<PageId, Vec<u8>>>>,
}

impl InMemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.lock().map(|p| p.contains_key(&id)).unwrap_or(false)
    }

    /// Serialized bytes of a stored page.
    pub fn raw(&self, id: PageId) -> Option<Vec<u8>> {
        self.lock().ok()?.get(&id).cloned()
    }

    fn lock(&self) -> MemoriesResult<std::sync::MutexGuard<'_, HashMap<PageId, Vec<u8>>>> {
        self.pages
            .lock()
            .map_err(|_| MemoriesError::persistence("page store lock poisoned"))
    }
}

impl PageStore for InMemoryPageStore {
    fn load_document(&self, id: PageId) -> MemoriesResult<PageDocument> {
        let bytes = self
            .lock()?
            .get(&id)
            .cloned()
            .ok_or_else(|| MemoriesError::persistence(format!("page {id} is not stored")))?;
        PageDocument::from_json_bytes(&bytes)
    }

    fn save_document(&self, doc: &PageDocument) -> MemoriesResult<()> {
        let bytes = doc.to_json_bytes()?;
        self.lock()?.insert(doc.id(), bytes);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/memory.rs"]
mod tests;
