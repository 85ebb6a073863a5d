//! Error types for jbod-driver

use std::path::PathBuf;

/// Result type for configuration resolution
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving the driver configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither or both of controller and driver mode were selected
    #[error("Exactly one of '--controller' or '--driver' must be set")]
    ModeSelection,

    /// Driver mode needs to know which node it serves
    #[error("'--node-id' is required in driver mode")]
    MissingNodeId,

    #[error("Invalid endpoint '{endpoint}': expected a unix:// or tcp:// address")]
    InvalidEndpoint { endpoint: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
