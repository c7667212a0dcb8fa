//! Error types for authz-codegen

/// Result type for authz-codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while rendering one artifact
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Template not found: no generator named '{id}' (available: {available})")]
    TemplateNotFound { id: String, available: String },

    #[error("Failed to render with '{generator}': {message}")]
    Render { generator: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn render(generator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            generator: generator.into(),
            message: message.into(),
        }
    }
}
