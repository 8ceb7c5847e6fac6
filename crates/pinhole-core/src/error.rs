use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by a [`UrlStorage`](crate::UrlStorage) backend.
///
/// "Not found" is deliberately absent: a missing or expired identifier is
/// reported as `Ok(None)` by [`UrlStorage::get`](crate::UrlStorage::get).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// No unused identifier was found within the retry bound.
    #[error("identifier space exhausted after {attempts} attempts")]
    CapacityExhausted { attempts: usize },
    /// A read or write against the backing store failed.
    #[error("storage i/o failed: {0}")]
    Io(String),
    /// The store could not be created or opened.
    #[error("failed to open storage: {0}")]
    Open(String),
    /// A stored record could not be decoded.
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Returns `true` for failures caused by the backing store rather than
    /// by namespace pressure.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Open(_) | Self::InvalidData(_))
    }
}
