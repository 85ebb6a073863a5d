//! Error types for jbod-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from jbod-core
    #[error(transparent)]
    Core(#[from] jbod_core::Error),

    /// Error from jbod-model
    #[error(transparent)]
    Model(#[from] jbod_model::Error),

    /// Error from jbod-registry
    #[error(transparent)]
    Registry(#[from] jbod_registry::Error),

    /// Error from jbod-sys
    #[error(transparent)]
    Sys(#[from] jbod_sys::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output or scan file error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML output error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
