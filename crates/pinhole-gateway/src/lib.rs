//! HTTP front end for Pinhole.
//!
//! Thin glue around the storage facade: `/shorten/` creates links, every
//! other path is resolved and redirected.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use config::{Cli, Config};
pub use state::AppState;
