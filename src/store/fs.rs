use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::document::{PageDocument, PageId};
use crate::editor::PageStore;
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// One `<id>.json` file per page under `root`.
#[derive(Clone, Debug)]
pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: PageId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Ids of all stored pages, sorted. A missing root holds no pages.
    pub fn list(&self) -> MemoriesResult<Vec<PageId>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(persistence(anyhow::Error::new(e).context(format!(
                    "list pages in '{}'",
                    self.root.display()
                ))));
            }
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("list pages in '{}'", self.root.display()))
                .map_err(persistence)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<PageId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Returns whether a page file was removed.
    pub fn delete(&self, id: PageId) -> MemoriesResult<bool> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(persistence(
                anyhow::Error::new(e).context(format!("delete page '{}'", path.display())),
            )),
        }
    }
}

impl PageStore for FsPageStore {
    fn load_document(&self, id: PageId) -> MemoriesResult<PageDocument> {
        let path = self.path_for(id);
        let bytes = fs::read(&path)
            .with_context(|| format!("read page '{}'", path.display()))
            .map_err(persistence)?;
        let doc = PageDocument::from_json_bytes(&bytes)?;
        if doc.id() != id {
            return Err(MemoriesError::persistence(format!(
                "page file '{}' holds page {}",
                path.display(),
                doc.id()
            )));
        }
        Ok(doc)
    }

    fn save_document(&self, doc: &PageDocument) -> MemoriesResult<()> {
        let bytes = doc.to_json_bytes()?;
        let path = self.path_for(doc.id());
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root)
            .with_context(|| format!("create page store '{}'", self.root.display()))
            .map_err(persistence)?;
        fs::write(&tmp, &bytes)
            .with_context(|| format!("write page '{}'", tmp.display()))
            .map_err(persistence)?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("move page into place at '{}'", path.display()))
            .map_err(persistence)?;

        tracing::debug!(page = %doc.id(), path = %path.display(), bytes = bytes.len(), "page written");
        Ok(())
    }
}

fn persistence(err: anyhow::Error) -> MemoriesError {
    MemoriesError::persistence(format!("{err:#}"))
}

#[cfg(test)]
#[path = "../../tests/unit/store/fs.rs"]
mod tests;
