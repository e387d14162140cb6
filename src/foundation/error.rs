use crate::document::ItemId;

/// Convenience result type used across the crate.
pub type MemoriesResult<T> = Result<T, MemoriesError>;

/// Top-level error taxonomy used by editor, render, and store APIs.
#[derive(thiserror::Error, Debug)]
pub enum MemoriesError {
    /// Invalid caller-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes could not be decoded or sized.
    #[error("decode error: {0}")]
    Decode(String),

    /// A mutation referenced an item that is not on the page.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// The page could not be rendered or encoded.
    #[error("flatten error: {0}")]
    Flatten(String),

    /// Delivering a flattened letter failed. Retryable by the caller.
    #[error("transmission error: {0}")]
    Transmission(String),

    /// Loading or saving a page document failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemoriesError {
    /// Build a [`MemoriesError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemoriesError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MemoriesError::Flatten`] value.
    pub fn flatten(msg: impl Into<String>) -> Self {
        Self::Flatten(msg.into())
    }

    /// Build a [`MemoriesError::Transmission`] value.
    pub fn transmission(msg: impl Into<String>) -> Self {
        Self::Transmission(msg.into())
    }

    /// Build a [`MemoriesError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`MemoriesError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failed operation may succeed if the caller tries again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transmission(_) | Self::Persistence(_))
    }
}

impl From<serde_json::Error> for MemoriesError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
