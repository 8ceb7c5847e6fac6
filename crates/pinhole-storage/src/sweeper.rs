use pinhole_core::Sweep;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default pause between two sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns a background task that periodically drops expired entries.
///
/// Without it, entries that expire and are never read again stay in the
/// store forever. Errors are logged and the loop keeps running; abort the
/// returned handle to stop it.
pub fn spawn_sweeper<S: Sweep + ?Sized>(store: Arc<S>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting expiry sweeper");

        loop {
            tokio::time::sleep(interval).await;

            match store.purge_expired().await {
                Ok(0) => debug!("sweep: no expired entries found"),
                Ok(removed) => info!(removed, "sweep: removed expired entries"),
                Err(e) => warn!(error = %e, "sweep failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::VolatileStore;
    use pinhole_core::{Ttl, UrlStorage};

    #[tokio::test]
    async fn sweeper_removes_expired_entries() {
        let store = Arc::new(VolatileStore::new());
        store
            .put("https://expire-soon.com", Ttl::from_millis(20))
            .await
            .unwrap();

        let handle = spawn_sweeper(Arc::clone(&store), Duration::from_millis(30));

        // Never read the entry again: only the sweeper can remove it.
        for _ in 0..50 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(store.is_empty(), "expired entry should have been swept");

        handle.abort();
    }

    #[tokio::test]
    async fn sweeper_preserves_live_entries() {
        let store = Arc::new(VolatileStore::new());
        let uri = store.put("https://forever.com", Ttl::NEVER).await.unwrap();

        let handle = spawn_sweeper(Arc::clone(&store), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(
            store.get(&uri).await.unwrap().as_deref(),
            Some("https://forever.com")
        );
        handle.abort();
    }

    #[tokio::test]
    async fn sweeper_can_be_aborted() {
        let store = Arc::new(VolatileStore::new());
        let handle = spawn_sweeper(store, Duration::from_secs(1));

        handle.abort();
        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
