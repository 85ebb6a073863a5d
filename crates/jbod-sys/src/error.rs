//! Error types for jbod-sys

use std::path::PathBuf;

/// Result type for jbod-sys operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the node OS boundary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to mount {device} at {target}: {message}")]
    MountFailed {
        device: PathBuf,
        target: PathBuf,
        message: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_failed_names_both_paths() {
        let err = Error::MountFailed {
            device: PathBuf::from("/dev/jbod/abc"),
            target: PathBuf::from("/var/lib/jbod/mnt/abc"),
            message: "wrong fs type".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("/dev/jbod/abc"));
        assert!(display.contains("/var/lib/jbod/mnt/abc"));
        assert!(display.contains("wrong fs type"));
    }
}
