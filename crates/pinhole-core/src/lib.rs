//! Core types and traits for the Pinhole URL shortener.
//!
//! This crate provides the value types shared by every storage backend
//! ([`Uri`], [`Entry`], [`Ttl`]), the error taxonomy, and the
//! [`UrlStorage`] contract that the HTTP layer talks to.

pub mod entry;
pub mod error;
pub mod storage;
pub mod ttl;
pub mod uri;

pub use entry::Entry;
pub use error::{Result, StorageError};
pub use storage::{Sweep, UrlStorage};
pub use ttl::Ttl;
pub use uri::Uri;
