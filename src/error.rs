use crate::types::SceneId;

/// Failure reported by a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("malformed record under {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<gloo::storage::errors::StorageError> for StoreError {
    fn from(err: gloo::storage::errors::StorageError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Errors surfaced by scene persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read from store: {0}")]
    StoreRead(#[source] StoreError),
    #[error("failed to write to store: {0}")]
    StoreWrite(#[source] StoreError),
    #[error("scene not found: {0}")]
    SceneNotFound(SceneId),
    /// Message is shown to the user as is
    #[error("{0}")]
    InvalidInput(&'static str),
}

impl SceneError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SceneNotFound(_))
    }
}
