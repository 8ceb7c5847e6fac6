use crate::DEFAULT_MAX_ATTEMPTS;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;
use jiff::Timestamp;
use pinhole_core::{Entry, Result, StorageError, Sweep, Ttl, Uri, UrlStorage};
use pinhole_generator::{Generator, RandomGenerator};
use tracing::{debug, trace};

/// In-memory implementation of [`UrlStorage`] using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Binding an identifier holds the write lock of
/// its shard for the whole check-and-insert, so two concurrent puts can
/// never claim the same identifier.
///
/// State lives for the lifetime of the process only.
#[derive(Debug)]
pub struct VolatileStore<G = RandomGenerator> {
    entries: DashMap<Uri, Entry>,
    generator: G,
    max_attempts: usize,
}

impl VolatileStore<RandomGenerator> {
    /// Creates a store generating alphanumeric identifiers of the default length.
    pub fn new() -> Self {
        Self::with_generator(RandomGenerator::default())
    }
}

impl Default for VolatileStore<RandomGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Generator> VolatileStore<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            entries: DashMap::new(),
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides how many candidates `put` tries before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl<G: Generator> UrlStorage for VolatileStore<G> {
    async fn put(&self, url: &str, ttl: Ttl) -> Result<Uri> {
        let now = Timestamp::now();
        let entry = Entry::created_at(url, ttl, now);

        for attempt in 1..=self.max_attempts {
            let uri = self.generator.generate();

            match self.entries.entry(uri.clone()) {
                Slot::Occupied(slot) if !slot.get().is_expired_at(now) => {
                    trace!(uri = %uri, attempt, "identifier collision");
                }
                Slot::Occupied(mut slot) => {
                    // Expired binding: reuse the slot in place.
                    slot.insert(entry);
                    debug!(uri = %uri, attempt, "bound url over expired entry");
                    return Ok(uri);
                }
                Slot::Vacant(slot) => {
                    slot.insert(entry);
                    debug!(uri = %uri, attempt, "bound url");
                    return Ok(uri);
                }
            }
        }

        Err(StorageError::CapacityExhausted {
            attempts: self.max_attempts,
        })
    }

    async fn get(&self, uri: &Uri) -> Result<Option<String>> {
        let now = Timestamp::now();

        let Some(entry) = self.entries.get(uri) else {
            trace!(uri = %uri, "identifier not found");
            return Ok(None);
        };

        if entry.is_expired_at(now) {
            drop(entry);
            // Only evict if the slot was not re-bound in the meantime.
            self.entries.remove_if(uri, |_, entry| entry.is_expired_at(now));
            debug!(uri = %uri, "evicted expired entry on read");
            return Ok(None);
        }

        Ok(Some(entry.url.clone()))
    }
}

#[async_trait]
impl<G: Generator> Sweep for VolatileStore<G> {
    async fn purge_expired(&self) -> Result<usize> {
        let now = Timestamp::now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinhole_generator::Alphabet;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn tiny_store(symbols: &str) -> VolatileStore<RandomGenerator> {
        let alphabet = Alphabet::new(symbols).unwrap();
        VolatileStore::with_generator(RandomGenerator::with_alphabet(1, alphabet).unwrap())
    }

    async fn wait_past(ttl_millis: u64) {
        tokio::time::sleep(Duration::from_millis(ttl_millis * 3)).await;
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = VolatileStore::new();

        let uri = store
            .put("https://example.com", Ttl::from_secs(60))
            .await
            .unwrap();

        assert_eq!(uri.code().len(), 8);
        let url = store.get(&uri).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn url_is_stored_verbatim() {
        let store = VolatileStore::new();
        let odd = "not even a url / with spaces?&=";

        let uri = store.put(odd, Ttl::NEVER).await.unwrap();
        assert_eq!(store.get(&uri).await.unwrap().as_deref(), Some(odd));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = VolatileStore::new();

        let result = store.get(&Uri::from_code("doesnotexist")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn expired_entry_returns_none_and_is_evicted() {
        let store = VolatileStore::new();

        let uri = store
            .put("https://example.com", Ttl::from_millis(20))
            .await
            .unwrap();
        wait_past(20).await;

        assert_eq!(store.len(), 1);
        assert!(store.get(&uri).await.unwrap().is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn put_over_expired_entry() {
        let store = tiny_store("a");

        let first = store
            .put("https://old.com", Ttl::from_millis(20))
            .await
            .unwrap();
        wait_past(20).await;

        // The only identifier is held by an expired entry, so it is reused.
        let second = store.put("https://new.com", Ttl::NEVER).await.unwrap();
        assert_eq!(first, second);

        let result = store.get(&second).await.unwrap();
        assert_eq!(result.as_deref(), Some("https://new.com"));
    }

    #[tokio::test]
    async fn exhausted_namespace_fails_without_overwriting() {
        let store = tiny_store("ab");

        let first = store.put("https://one.com", Ttl::NEVER).await.unwrap();
        let second = store.put("https://two.com", Ttl::NEVER).await.unwrap();
        assert_ne!(first, second);

        let err = store.put("https://three.com", Ttl::NEVER).await.unwrap_err();
        assert_eq!(
            err,
            StorageError::CapacityExhausted {
                attempts: DEFAULT_MAX_ATTEMPTS
            }
        );

        assert_eq!(
            store.get(&first).await.unwrap().as_deref(),
            Some("https://one.com")
        );
        assert_eq!(
            store.get(&second).await.unwrap().as_deref(),
            Some("https://two.com")
        );
    }

    #[tokio::test]
    async fn custom_attempt_bound_is_reported() {
        let store = tiny_store("a").with_max_attempts(3);
        store.put("https://one.com", Ttl::NEVER).await.unwrap();

        let err = store.put("https://two.com", Ttl::NEVER).await.unwrap_err();
        assert_eq!(err, StorageError::CapacityExhausted { attempts: 3 });
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let store = VolatileStore::new();

        let short = store
            .put("https://short.com", Ttl::from_millis(20))
            .await
            .unwrap();
        let long = store
            .put("https://long.com", Ttl::from_secs(3600))
            .await
            .unwrap();
        let forever = store.put("https://forever.com", Ttl::NEVER).await.unwrap();
        wait_past(20).await;

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 2);
        assert!(store.get(&short).await.unwrap().is_none());
        assert!(store.get(&long).await.unwrap().is_some());
        assert!(store.get(&forever).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_access() {
        let store = Arc::new(VolatileStore::new());
        let mut handles = vec![];

        for i in 0..64u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let url = format!("https://example{}.com", i);
                let uri = store.put(&url, Ttl::NEVER).await.unwrap();
                (uri, url)
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            let (uri, url) = handle.await.unwrap();
            assert!(seen.insert(uri.clone()), "duplicate identifier {uri}");
            assert_eq!(store.get(&uri).await.unwrap(), Some(url));
        }
    }
}
