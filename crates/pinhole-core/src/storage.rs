use crate::error::Result;
use crate::ttl::Ttl;
use crate::uri::Uri;
use async_trait::async_trait;

/// The storage contract the HTTP layer talks to.
///
/// Every backend behaves identically from the outside: an identifier
/// resolves to at most one live mapping, and an expired mapping is never
/// returned again even if it is still physically present.
#[async_trait]
pub trait UrlStorage: Send + Sync + 'static {
    /// Binds `url` to a fresh identifier and returns it.
    ///
    /// Never overwrites a live mapping. Fails with
    /// [`StorageError::CapacityExhausted`](crate::StorageError::CapacityExhausted)
    /// when no free identifier was found within the retry bound.
    async fn put(&self, url: &str, ttl: Ttl) -> Result<Uri>;

    /// Resolves `uri` to its target URL.
    ///
    /// Returns `Ok(None)` if the identifier is unknown or has expired.
    async fn get(&self, uri: &Uri) -> Result<Option<String>>;
}

/// Stores that can proactively drop expired mappings.
#[async_trait]
pub trait Sweep: Send + Sync + 'static {
    /// Removes every expired mapping and returns how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}
