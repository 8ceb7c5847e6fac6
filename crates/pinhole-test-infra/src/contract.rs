//! Behaviour every storage backend must share.
//!
//! The checks only use the public [`UrlStorage`] operations, so they hold
//! regardless of whether a backend evicts eagerly or lazily.

use pinhole_core::{StorageError, Ttl, Uri, UrlStorage};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// TTL used by expiration checks.
pub const SHORT_TTL: Duration = Duration::from_millis(50);

/// Longer than any finite TTL used by the checks.
pub const SETTLE: Duration = Duration::from_millis(150);

/// A fresh binding is immediately resolvable.
pub async fn round_trip<S: UrlStorage + ?Sized>(store: &S) {
    let url = "https://example.com/some/path?query=1";
    let uri = store.put(url, Ttl::from_secs(60)).await.unwrap();

    assert!(uri.as_str().starts_with('/'));
    assert_eq!(store.get(&uri).await.unwrap().as_deref(), Some(url));
}

/// Sequential puts never hand out the same identifier twice.
pub async fn unique_identifiers<S: UrlStorage + ?Sized>(store: &S, count: usize) {
    let mut seen = HashSet::with_capacity(count);

    for i in 0..count {
        let uri = store
            .put(&format!("https://example.com/{i}"), Ttl::from_secs(60))
            .await
            .unwrap();
        assert!(seen.insert(uri.clone()), "duplicate identifier {uri}");
    }
}

/// A mapping stops resolving once its TTL has passed.
pub async fn expiration<S: UrlStorage + ?Sized>(store: &S) {
    let uri = store
        .put("https://expiring.com", Ttl::from(SHORT_TTL))
        .await
        .unwrap();
    assert!(store.get(&uri).await.unwrap().is_some());

    tokio::time::sleep(SETTLE).await;

    assert!(store.get(&uri).await.unwrap().is_none());
    // And stays gone.
    assert!(store.get(&uri).await.unwrap().is_none());
}

/// Zero and negative TTLs keep the mapping indefinitely.
pub async fn never_expires<S: UrlStorage + ?Sized>(store: &S) {
    let zero = store.put("https://zero.com", Ttl::from_secs(0)).await.unwrap();
    let negative = store
        .put("https://negative.com", Ttl::from_secs(-10))
        .await
        .unwrap();

    tokio::time::sleep(SETTLE).await;

    assert_eq!(
        store.get(&zero).await.unwrap().as_deref(),
        Some("https://zero.com")
    );
    assert_eq!(
        store.get(&negative).await.unwrap().as_deref(),
        Some("https://negative.com")
    );
}

/// Unknown identifiers are reported as absent, not as errors.
pub async fn unknown_not_found<S: UrlStorage + ?Sized>(store: &S) {
    let result = store.get(&Uri::parse("/doesnotexist")).await;
    assert_eq!(result, Ok(None));
}

/// Concurrent puts with distinct URLs each get their own identifier.
pub async fn concurrent_puts<S: UrlStorage + ?Sized>(store: Arc<S>, count: usize) {
    let handles: Vec<_> = (0..count)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let url = format!("https://concurrent{i}.com");
                let uri = store.put(&url, Ttl::NEVER).await.unwrap();
                (uri, url)
            })
        })
        .collect();

    let mut bindings = Vec::with_capacity(count);
    for handle in handles {
        bindings.push(handle.await.unwrap());
    }

    let distinct: HashSet<_> = bindings.iter().map(|(uri, _)| uri.clone()).collect();
    assert_eq!(distinct.len(), count, "duplicate identifier assigned");

    for (uri, url) in bindings {
        assert_eq!(store.get(&uri).await.unwrap(), Some(url));
    }
}

/// Fills a store whose identifier space holds exactly `capacity` values and
/// checks that one more put fails without touching live bindings.
pub async fn capacity_exhausted<S: UrlStorage + ?Sized>(store: &S, capacity: usize) {
    let mut bindings = Vec::with_capacity(capacity);
    for i in 0..capacity {
        let url = format!("https://slot{i}.com");
        let uri = store.put(&url, Ttl::NEVER).await.unwrap();
        bindings.push((uri, url));
    }

    let err = store.put("https://overflow.com", Ttl::NEVER).await.unwrap_err();
    assert!(
        matches!(err, StorageError::CapacityExhausted { .. }),
        "expected CapacityExhausted, got {err:?}"
    );

    for (uri, url) in bindings {
        assert_eq!(store.get(&uri).await.unwrap(), Some(url));
    }
}
