//! Narrow interfaces the editor consumes, injected at session creation.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::assets::TemplateSource;
use crate::document::{PageDocument, PageId};
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::render::{InkRasterizer, OutputFormat};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = MemoriesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self).map_err(|e| {
                    MemoriesError::validation(format!(concat!("invalid ", $what, " '{}': {}"), s, e))
                })
            }
        }
    };
}

uuid_id!(
    /// Account identifier of a sender or recipient.
    UserId,
    "user id"
);
uuid_id!(LetterId, "letter id");

/// Record of a delivered letter.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Letter {
    pub id: LetterId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    /// Where the flattened image was stored.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A flattened page on its way to a recipient.
#[derive(Clone, Copy, Debug)]
pub struct OutgoingLetter<'a> {
    pub sender: UserId,
    pub recipient: UserId,
    pub image: &'a [u8],
    pub format: OutputFormat,
}

/// Loads and saves page documents. Blobs must round-trip byte-exactly.
pub trait PageStore: Send + Sync {
    fn load_document(&self, id: PageId) -> MemoriesResult<PageDocument>;
    fn save_document(&self, doc: &PageDocument) -> MemoriesResult<()>;
}

/// Delivers a flattened letter image. Failures are reported as
/// [`MemoriesError::Transmission`] and may be retried by the caller.
pub trait LetterTransport: Send + Sync {
    fn send(&self, letter: OutgoingLetter<'_>) -> MemoriesResult<Letter>;
}

/// Everything a [`Session`](crate::editor::Session) talks to outside the document.
pub struct Collaborators {
    pub store: Box<dyn PageStore>,
    pub transport: Option<Box<dyn LetterTransport>>,
    pub templates: Option<Box<dyn TemplateSource>>,
    pub ink: Option<Box<dyn InkRasterizer>>,
}

impl Collaborators {
    pub fn new(store: impl PageStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            transport: None,
            templates: None,
            ink: None,
        }
    }

    pub fn with_transport(mut self, transport: impl LetterTransport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn with_templates(mut self, templates: impl TemplateSource + 'static) -> Self {
        self.templates = Some(Box::new(templates));
        self
    }

    pub fn with_ink(mut self, ink: impl InkRasterizer + 'static) -> Self {
        self.ink = Some(Box::new(ink));
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("transport", &self.transport.is_some())
            .field("templates", &self.templates.is_some())
            .field("ink", &self.ink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/collab.rs"]
mod tests;
