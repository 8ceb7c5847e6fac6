//! Shared fixtures for Pinhole tests.
//!
//! [`TempDatabase`] hands out a throwaway database path, and [`contract`]
//! holds checks that every [`UrlStorage`](pinhole_core::UrlStorage)
//! backend must pass.

pub mod contract;
pub mod database;
pub mod error;

pub use database::TempDatabase;
pub use error::{Result, TestInfraError};
