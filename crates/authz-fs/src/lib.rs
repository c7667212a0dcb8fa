//! Filesystem helpers for authz-sync
//!
//! Provides normalized paths, atomic text writes and format-aware
//! configuration loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
