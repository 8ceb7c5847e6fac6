use std::sync::Arc;

use pinhole_core::{Ttl, UrlStorage};

#[derive(Clone)]
pub struct AppState {
    storage: Arc<dyn UrlStorage>,
    ttl: Ttl,
    hostname: Option<String>,
}

impl AppState {
    pub fn new(storage: Arc<dyn UrlStorage>, ttl: Ttl, hostname: Option<String>) -> Self {
        Self {
            storage,
            ttl,
            hostname,
        }
    }

    pub fn storage(&self) -> &dyn UrlStorage {
        self.storage.as_ref()
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Configured scheme and host that replaces the one derived from requests.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
}
