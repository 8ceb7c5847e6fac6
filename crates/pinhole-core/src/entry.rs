use crate::ttl::Ttl;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored mapping from an identifier to its target URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The target URL, stored verbatim.
    pub url: String,
    /// When the mapping was created.
    pub created_at: Timestamp,
    /// When the mapping expires, if ever.
    pub expires_at: Option<Timestamp>,
}

impl Entry {
    /// Creates an entry for `url` starting now.
    pub fn new(url: impl Into<String>, ttl: Ttl) -> Self {
        Self::created_at(url, ttl, Timestamp::now())
    }

    /// Creates an entry for `url` as if it was created at `now`.
    pub fn created_at(url: impl Into<String>, ttl: Ttl, now: Timestamp) -> Self {
        Self {
            url: url.into(),
            created_at: now,
            expires_at: ttl.expires_at(now),
        }
    }

    /// An entry is expired once `now` has reached its expiration instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}
