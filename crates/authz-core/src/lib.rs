//! Core sync and validation logic for authz-sync
//!
//! - **compare**: exact comparison with a unified diff on divergence
//! - **mapping**: `PATH[:GENERATOR]` output mappings, validated as a batch
//! - **sync**: per-artifact state machine that generates, compares and
//!   optionally rewrites checked-in artifacts
//! - **validate**: field-presence validation of hand-written model files
//! - **config**: the optional `authz-sync.toml` file

pub mod compare;
pub mod config;
pub mod error;
pub mod mapping;
pub mod sync;
pub mod validate;

pub use compare::{Comparison, compare};
pub use config::{DEFAULT_CONFIG_FILE, OutputEntry, SyncConfig, ValidateSection};
pub use error::{Error, Result};
pub use mapping::OutputMapping;
pub use sync::{
    ArtifactStore, DiskStore, MemoryStore, SyncEngine, SyncOptions, SyncReport, SyncResult,
    SyncState,
};
pub use validate::{
    FieldContract, FieldDecl, FieldPresenceValidator, ModelDeclaration, ModelReader,
    PythonModelReader, TypeScriptModelReader, ValidationError, load_declaration,
    reader_for_extension,
};
