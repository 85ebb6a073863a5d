//! Error types for jbod-model

/// Result type for jbod-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while interpreting drive records
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid access tier '{value}': expected one of hot, cold, warm")]
    InvalidAccessTier { value: String },

    #[error("Invalid drive status '{value}'")]
    InvalidStatus { value: String },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
