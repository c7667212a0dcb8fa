//! Error types for authz-schema

/// Result type for authz-schema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling the grammar, parsing or querying
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The grammar tables could not be built; nothing can be parsed.
    #[error("Schema grammar unavailable: {reason}")]
    GrammarUnavailable { reason: String },

    /// The engine refused to produce any tree for the input.
    #[error("Failed to parse schema: {reason}")]
    ParseFailure { reason: String },

    #[error("Invalid query at offset {offset}: {message}")]
    InvalidQuery { offset: usize, message: String },

    #[error(transparent)]
    Fs(#[from] authz_fs::Error),
}

impl Error {
    pub fn invalid_query(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            offset,
            message: message.into(),
        }
    }
}
