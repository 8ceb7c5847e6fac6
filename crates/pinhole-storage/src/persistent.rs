use crate::DEFAULT_MAX_ATTEMPTS;
use async_trait::async_trait;
use jiff::Timestamp;
use pinhole_core::{Entry, Result, StorageError, Sweep, Ttl, Uri, UrlStorage};
use pinhole_generator::{Generator, RandomGenerator};
use sled::transaction::{ConflictableTransactionResult, TransactionError};
use sled::{IVec, Tree};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Name of the tree holding `uri -> entry` records.
pub const TREE_NAME: &str = "urls";

/// Durable implementation of [`UrlStorage`] backed by sled.
///
/// Binding runs inside a sled transaction, so an identifier is only ever
/// claimed by one writer. Expiration is enforced at read time; a stale
/// record found by `get` is deleted afterwards on the blocking pool.
///
/// sled holds an exclusive lock on its directory, so only one process can
/// open a given database.
pub struct PersistentStore<G = RandomGenerator> {
    db: sled::Db,
    tree: Tree,
    generator: Arc<G>,
    max_attempts: usize,
}

impl<G> Clone for PersistentStore<G> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            tree: self.tree.clone(),
            generator: Arc::clone(&self.generator),
            max_attempts: self.max_attempts,
        }
    }
}

impl<G> std::fmt::Debug for PersistentStore<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("tree", &TREE_NAME)
            .field("records", &self.tree.len())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Outcome of a read, computed off the async runtime.
enum Lookup {
    Missing,
    Live(String),
    Expired(IVec),
}

impl PersistentStore<RandomGenerator> {
    /// Opens (or creates) the database at `path` with the default generator.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_generator(path, RandomGenerator::default())
    }
}

impl<G: Generator> PersistentStore<G> {
    /// Opens (or creates) the database at `path`.
    ///
    /// Creates missing parent directories. Any failure, including the
    /// directory being locked by another process, is reported as
    /// [`StorageError::Open`].
    pub fn open_with_generator(path: impl AsRef<Path>, generator: G) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Open(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = sled::open(path)
            .map_err(|e| StorageError::Open(format!("{}: {e}", path.display())))?;
        let tree = db
            .open_tree(TREE_NAME)
            .map_err(|e| StorageError::Open(format!("{}: {e}", path.display())))?;

        info!(path = %path.display(), records = tree.len(), "opened persistent url store");

        Ok(Self {
            db,
            tree,
            generator: Arc::new(generator),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Overrides how many candidates `put` tries before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Number of physically stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Flushes all pending writes to disk.
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(io_error)?;
        Ok(())
    }

    fn put_blocking(&self, url: &str, ttl: Ttl) -> Result<Uri> {
        let now = Timestamp::now();
        let encoded = encode(&Entry::created_at(url, ttl, now))?;

        for attempt in 1..=self.max_attempts {
            let uri = self.generator.generate();

            if self.try_bind(&uri, &encoded, now)? {
                self.tree.flush().map_err(io_error)?;
                debug!(uri = %uri, attempt, "bound url");
                return Ok(uri);
            }

            trace!(uri = %uri, attempt, "identifier collision");
        }

        Err(StorageError::CapacityExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Writes `encoded` under `uri` unless a live record already holds it.
    ///
    /// An undecodable record counts as occupied; it is never overwritten.
    fn try_bind(&self, uri: &Uri, encoded: &[u8], now: Timestamp) -> Result<bool> {
        let outcome = self
            .tree
            .transaction(|tx| -> ConflictableTransactionResult<bool, StorageError> {
                if let Some(raw) = tx.get(uri.as_bytes())? {
                    match decode(&raw) {
                        Ok(existing) if !existing.is_expired_at(now) => return Ok(false),
                        Ok(_) => {}
                        Err(e) => {
                            warn!(uri = %uri, error = %e, "undecodable record holds identifier");
                            return Ok(false);
                        }
                    }
                }
                tx.insert(uri.as_bytes(), encoded)?;
                Ok(true)
            });

        outcome.map_err(|e| match e {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => io_error(e),
        })
    }

    fn lookup_blocking(&self, uri: &Uri) -> Result<Lookup> {
        let Some(raw) = self.tree.get(uri.as_bytes()).map_err(io_error)? else {
            return Ok(Lookup::Missing);
        };

        let entry = decode(&raw)?;
        if entry.is_expired_at(Timestamp::now()) {
            return Ok(Lookup::Expired(raw));
        }

        Ok(Lookup::Live(entry.url))
    }

    /// Deletes `uri` on the blocking pool, but only if it still holds `stale`.
    fn schedule_eviction(&self, uri: Uri, stale: IVec) {
        let tree = self.tree.clone();

        tokio::task::spawn_blocking(move || {
            match tree.compare_and_swap(uri.as_bytes(), Some(&stale), None::<&[u8]>) {
                Ok(Ok(())) => debug!(uri = %uri, "evicted expired record"),
                Ok(Err(_)) => trace!(uri = %uri, "record changed before eviction"),
                Err(e) => warn!(uri = %uri, error = %e, "failed to evict expired record"),
            }
        });
    }

    fn purge_blocking(&self) -> Result<usize> {
        let now = Timestamp::now();
        let mut removed = 0;

        for item in self.tree.iter() {
            let (key, raw) = item.map_err(io_error)?;

            let expired = match decode(&raw) {
                Ok(entry) => entry.is_expired_at(now),
                Err(e) => {
                    warn!(
                        key = %String::from_utf8_lossy(&key),
                        error = %e,
                        "skipping undecodable record"
                    );
                    false
                }
            };

            if expired
                && self
                    .tree
                    .compare_and_swap(&key, Some(&raw), None::<&[u8]>)
                    .map_err(io_error)?
                    .is_ok()
            {
                removed += 1;
            }
        }

        if removed > 0 {
            self.tree.flush().map_err(io_error)?;
        }

        Ok(removed)
    }
}

#[async_trait]
impl<G: Generator> UrlStorage for PersistentStore<G> {
    async fn put(&self, url: &str, ttl: Ttl) -> Result<Uri> {
        let store = self.clone();
        let url = url.to_owned();
        blocking(move || store.put_blocking(&url, ttl)).await
    }

    async fn get(&self, uri: &Uri) -> Result<Option<String>> {
        let store = self.clone();
        let key = uri.clone();

        match blocking(move || store.lookup_blocking(&key)).await? {
            Lookup::Missing => {
                trace!(uri = %uri, "identifier not found");
                Ok(None)
            }
            Lookup::Live(url) => Ok(Some(url)),
            Lookup::Expired(stale) => {
                self.schedule_eviction(uri.clone(), stale);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<G: Generator> Sweep for PersistentStore<G> {
    async fn purge_expired(&self) -> Result<usize> {
        let store = self.clone();
        blocking(move || store.purge_blocking()).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Io(format!("blocking task failed: {e}")))?
}

fn encode(entry: &Entry) -> Result<Vec<u8>> {
    serde_json::to_vec(entry)
        .map_err(|e| StorageError::InvalidData(format!("failed to encode entry: {e}")))
}

fn decode(raw: &[u8]) -> Result<Entry> {
    serde_json::from_slice(raw)
        .map_err(|e| StorageError::InvalidData(format!("failed to decode entry: {e}")))
}

fn io_error(err: sled::Error) -> StorageError {
    StorageError::Io(err.to_string())
}
