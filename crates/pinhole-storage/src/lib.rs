//! Storage backends for Pinhole.
//!
//! [`VolatileStore`] keeps mappings in a sharded in-process map;
//! [`PersistentStore`] keeps them in a sled database. [`Storage`] wraps
//! whichever one the process was configured with.

pub mod backend;
pub mod memory;
pub mod persistent;
pub mod sweeper;

pub use backend::{Backend, Storage, StorageSettings};
pub use memory::VolatileStore;
pub use persistent::PersistentStore;
pub use pinhole_core::{Result, StorageError, Sweep, UrlStorage};
pub use pinhole_generator::Alphabet;
pub use sweeper::spawn_sweeper;

/// Default number of candidate identifiers tried by a single `put`.
pub const DEFAULT_MAX_ATTEMPTS: usize = 32;
