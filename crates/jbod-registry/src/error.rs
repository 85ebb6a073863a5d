//! Error types for jbod-registry

use std::path::PathBuf;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by a drive registry
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record with this name exists
    #[error("Drive record not found: {name}")]
    NotFound { name: String },

    /// The write carried a stale resource version
    #[error("Conflict updating {name}: expected version {expected}, found {actual}")]
    Conflict {
        name: String,
        expected: String,
        actual: String,
    },

    /// A record with this name already exists
    #[error("Drive record already exists: {name}")]
    AlreadyExists { name: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Corrupt registry document at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Any other store failure
    #[error("Registry error: {message}")]
    Backend { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_helpers() {
        let not_found = Error::NotFound {
            name: "d1".to_string(),
        };
        let conflict = Error::Conflict {
            name: "d1".to_string(),
            expected: "3".to_string(),
            actual: "4".to_string(),
        };

        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());
        assert!(conflict.is_conflict());
        assert!(!Error::backend("boom").is_conflict());
    }

    #[test]
    fn conflict_display_mentions_versions() {
        let err = Error::Conflict {
            name: "d1".to_string(),
            expected: "3".to_string(),
            actual: "4".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("d1"));
        assert!(display.contains('3'));
        assert!(display.contains('4'));
    }
}
