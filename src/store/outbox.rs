use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::editor::{Letter, LetterId, LetterTransport, OutgoingLetter, UserId};
use crate::foundation::error::{MemoriesError, MemoriesResult};

/// Delivers letters into a directory tree:
/// `<root>/letters/<recipient>/<letter-id>.<ext>` next to a `<letter-id>.json`
/// [`Letter`] record.
#[derive(Clone, Debug)]
pub struct OutboxTransport {
    root: PathBuf,
}

impl OutboxTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn recipient_dir(&self, recipient: UserId) -> PathBuf {
        self.root.join("letters").join(recipient.to_string())
    }

    /// Letters delivered to `recipient`, oldest first.
    pub fn letters_for(&self, recipient: UserId) -> MemoriesResult<Vec<Letter>> {
        let dir = self.recipient_dir(recipient);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut letters = Vec::new();
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("list letters in '{}'", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("list letters in '{}'", dir.display()))?
                .path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes =
                fs::read(&path).with_context(|| format!("read letter '{}'", path.display()))?;
            letters.push(serde_json::from_slice::<Letter>(&bytes)?);
        }
        letters.sort_by_key(|l| l.created_at);
        Ok(letters)
    }

    /// Write the image, then the record. A record that cannot be written
    /// takes the image with it, so no image is left without a record.
    fn deliver(&self, id: LetterId, letter: &OutgoingLetter<'_>) -> anyhow::Result<Letter> {
        let dir = self.recipient_dir(letter.recipient);
        fs::create_dir_all(&dir).with_context(|| format!("create outbox '{}'", dir.display()))?;

        let image_path = dir.join(format!("{id}.{}", letter.format.extension()));
        fs::write(&image_path, letter.image)
            .with_context(|| format!("write letter image '{}'", image_path.display()))?;

        let record = Letter {
            id,
            sender_id: letter.sender,
            recipient_id: letter.recipient,
            image_url: image_path.display().to_string(),
            created_at: chrono::Utc::now(),
        };
        if let Err(e) = self.write_record(&dir, &record) {
            if let Err(rm) = fs::remove_file(&image_path) {
                tracing::warn!(path = %image_path.display(), error = %rm, "could not remove orphaned letter image");
            }
            return Err(e);
        }
        Ok(record)
    }

    /// Records go through a temp file so readers never see a partial one.
    fn write_record(&self, dir: &Path, record: &Letter) -> anyhow::Result<()> {
        let record_path = dir.join(format!("{}.json", record.id));
        let tmp = record_path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)
            .with_context(|| format!("write letter record '{}'", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &record_path) {
            let _ = fs::remove_file(&tmp);
            return Err(anyhow::Error::new(e)
                .context(format!("move letter record into place at '{}'", record_path.display())));
        }
        Ok(())
    }
}

impl LetterTransport for OutboxTransport {
    fn send(&self, letter: OutgoingLetter<'_>) -> MemoriesResult<Letter> {
        if letter.image.is_empty() {
            return Err(MemoriesError::transmission("letter image is empty"));
        }
        let record = self
            .deliver(LetterId::new(), &letter)
            .map_err(|e| MemoriesError::transmission(format!("{e:#}")))?;
        tracing::debug!(
            letter = %record.id,
            recipient = %record.recipient_id,
            mime = letter.format.mime_type(),
            "letter written to outbox"
        );
        Ok(record)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/outbox.rs"]
mod tests;
