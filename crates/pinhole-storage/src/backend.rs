use crate::memory::VolatileStore;
use crate::persistent::PersistentStore;
use crate::DEFAULT_MAX_ATTEMPTS;
use async_trait::async_trait;
use pinhole_core::{Result, StorageError, Sweep, Ttl, Uri, UrlStorage};
use pinhole_generator::random::DEFAULT_LENGTH;
use pinhole_generator::{Alphabet, RandomGenerator};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tracing::info;
use typed_builder::TypedBuilder;

/// Which storage backend to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Process-local map; contents are lost on restart.
    Volatile,
    /// sled database at `path`.
    Persistent { path: PathBuf },
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Volatile => write!(f, "memory"),
            Backend::Persistent { path } => write!(f, "sled({})", path.display()),
        }
    }
}

/// Construction-time settings for a [`Storage`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct StorageSettings {
    pub backend: Backend,
    /// Number of symbols in a generated identifier.
    #[builder(default = DEFAULT_LENGTH)]
    pub uri_length: usize,
    /// Collision retries per `put`.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
    #[builder(default)]
    pub alphabet: Alphabet,
}

/// The storage facade handed to the HTTP layer.
///
/// Adding a backend means adding a variant here and an arm in
/// [`Storage::open`]; callers only ever see [`UrlStorage`].
#[derive(Debug)]
pub enum Storage {
    Volatile(VolatileStore),
    Persistent(PersistentStore),
}

impl Storage {
    /// Builds the backend described by `settings`.
    ///
    /// Failures are reported as [`StorageError::Open`] and are meant to
    /// abort startup.
    pub fn open(settings: &StorageSettings) -> Result<Self> {
        let generator =
            RandomGenerator::with_alphabet(settings.uri_length, settings.alphabet.clone())
                .map_err(|e| StorageError::Open(format!("invalid identifier settings: {e}")))?;

        let storage = match &settings.backend {
            Backend::Volatile => Storage::Volatile(
                VolatileStore::with_generator(generator).with_max_attempts(settings.max_attempts),
            ),
            Backend::Persistent { path } => Storage::Persistent(
                PersistentStore::open_with_generator(path, generator)?
                    .with_max_attempts(settings.max_attempts),
            ),
        };

        info!(
            backend = %settings.backend,
            uri_length = settings.uri_length,
            max_attempts = settings.max_attempts,
            "storage ready"
        );

        Ok(storage)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Storage::Volatile(_) => "memory",
            Storage::Persistent(_) => "sled",
        }
    }

    /// Flushes pending writes; a no-op for the volatile backend.
    pub async fn flush(&self) -> Result<()> {
        match self {
            Storage::Volatile(_) => Ok(()),
            Storage::Persistent(store) => store.flush().await,
        }
    }
}

#[async_trait]
impl UrlStorage for Storage {
    async fn put(&self, url: &str, ttl: Ttl) -> Result<Uri> {
        match self {
            Storage::Volatile(store) => store.put(url, ttl).await,
            Storage::Persistent(store) => store.put(url, ttl).await,
        }
    }

    async fn get(&self, uri: &Uri) -> Result<Option<String>> {
        match self {
            Storage::Volatile(store) => store.get(uri).await,
            Storage::Persistent(store) => store.get(uri).await,
        }
    }
}

#[async_trait]
impl Sweep for Storage {
    async fn purge_expired(&self) -> Result<usize> {
        match self {
            Storage::Volatile(store) => store.purge_expired().await,
            Storage::Persistent(store) => store.purge_expired().await,
        }
    }
}
