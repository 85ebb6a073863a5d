//! Error types for jbod-core

/// Result type for jbod-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during reconciliation and tagging
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Conflicting writes outlasted the retry budget
    #[error("Gave up updating drive {name} after {attempts} conflicting attempts")]
    RetryExhausted {
        name: String,
        attempts: u32,
        #[source]
        source: jbod_registry::Error,
    },

    /// A bulk operation was requested without any selector
    #[error("At least one of '--all', '--drives', '--nodes' or '--status' must be specified")]
    MissingSelector,

    /// The registry holds no drive records at all
    #[error("No drive records found")]
    NoDrivesFound,

    /// No drive record matched the selection
    #[error("No drives matched the given selectors")]
    NoMatchingDrives,

    // Transparent wrappers for underlying crate errors
    /// Registry error from jbod-registry
    #[error(transparent)]
    Registry(#[from] jbod_registry::Error),

    /// Validation error from jbod-model
    #[error(transparent)]
    Model(#[from] jbod_model::Error),

    /// Node OS error from jbod-sys
    #[error(transparent)]
    Sys(#[from] jbod_sys::Error),
}

impl Error {
    /// Conflict that may succeed if the transaction is re-run.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Registry(e) if e.is_conflict())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Registry(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_classification_passes_through() {
        let conflict: Error = jbod_registry::Error::Conflict {
            name: "d1".to_string(),
            expected: "1".to_string(),
            actual: "2".to_string(),
        }
        .into();
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());

        let not_found: Error = jbod_registry::Error::NotFound {
            name: "d1".to_string(),
        }
        .into();
        assert!(not_found.is_not_found());
    }

    #[test]
    fn retry_exhausted_keeps_source() {
        use std::error::Error as _;

        let err = Error::RetryExhausted {
            name: "d1".to_string(),
            attempts: 5,
            source: jbod_registry::Error::Conflict {
                name: "d1".to_string(),
                expected: "1".to_string(),
                actual: "2".to_string(),
            },
        };
        assert!(err.to_string().contains("5 conflicting attempts"));
        assert!(err.source().is_some());
    }
}
