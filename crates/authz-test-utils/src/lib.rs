//! Shared test utilities for the authz-sync workspace.
//!
//! - [`fixtures`]: schema and model-file texts used across crates
//! - [`workspace`]: [`TestWorkspace`], a temporary directory with assertion helpers

pub mod fixtures;
pub mod workspace;

pub use workspace::TestWorkspace;
