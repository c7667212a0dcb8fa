//! Error types for authz-core

use std::path::PathBuf;

/// Result type for authz-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole run.
///
/// Per-artifact failures never show up here; they are recorded in the
/// artifact's [`SyncResult`](crate::SyncResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more output mappings were rejected before any work started
    #[error("Invalid output mappings:\n{}", .problems.iter().map(|p| format!("  - {p}")).collect::<Vec<_>>().join("\n"))]
    InvalidOutputMappings { problems: Vec<String> },

    #[error("Schema file {path} does not exist")]
    SchemaNotFound { path: PathBuf },

    #[error("Model file {path} does not exist")]
    ModelNotFound { path: PathBuf },

    #[error("No declaration named '{name}' found in {path}")]
    ModelClassNotFound { path: PathBuf, name: String },

    #[error("Unsupported model file {path}: expected a .py, .pyi or .ts file")]
    UnsupportedModelFormat { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] authz_fs::Error),

    #[error(transparent)]
    Schema(#[from] authz_schema::Error),

    #[error(transparent)]
    Codegen(#[from] authz_codegen::Error),
}
