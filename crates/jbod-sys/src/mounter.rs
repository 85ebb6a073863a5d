//! Mount primitive
//!
//! [`Mounter`] is the seam between the reconciler and the host. The default
//! [`CommandMounter`] shells out to the host `mount` binary; tests substitute
//! recording or failing implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Result};

/// Mounts a block device at a target directory.
///
/// Implementations must be cancellation safe: dropping the returned future
/// abandons the mount attempt.
#[async_trait]
pub trait Mounter: Send + Sync {
    async fn mount(&self, device: &Path, target: &Path, options: &[String]) -> Result<()>;
}

/// Mounts through the host `mount` binary.
#[derive(Debug, Clone)]
pub struct CommandMounter {
    binary: PathBuf,
}

impl Default for CommandMounter {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("mount"),
        }
    }
}

impl CommandMounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different mount binary (for example a wrapper that enters the
    /// host mount namespace).
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Mounter for CommandMounter {
    async fn mount(&self, device: &Path, target: &Path, options: &[String]) -> Result<()> {
        let failed = |message: String| Error::MountFailed {
            device: device.to_path_buf(),
            target: target.to_path_buf(),
            message,
        };

        tokio::fs::create_dir_all(target)
            .await
            .map_err(|e| Error::io(target, e))?;

        let mut cmd = Command::new(&self.binary);
        if !options.is_empty() {
            cmd.arg("-o").arg(options.join(","));
        }
        cmd.arg(device).arg(target).kill_on_drop(true);

        tracing::debug!(device = %device.display(), target = %target.display(), "Mounting drive");

        let output = cmd.output().await.map_err(|e| failed(e.to_string()))?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            Err(failed(format!("exit code {code}: {stderr}")))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn successful_mount_creates_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("mnt").join("6f1c");
        let mounter = CommandMounter::with_binary("true");

        mounter
            .mount(Path::new("/dev/jbod/6f1c"), &target, &[])
            .await
            .unwrap();

        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn failing_binary_reports_mount_failure() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("6f1c");
        let mounter = CommandMounter::with_binary("false");

        let err = mounter
            .mount(Path::new("/dev/jbod/6f1c"), &target, &["prjquota".to_string()])
            .await
            .unwrap_err();

        match err {
            Error::MountFailed { device, message, .. } => {
                assert_eq!(device, PathBuf::from("/dev/jbod/6f1c"));
                assert!(message.contains("exit code 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_reports_mount_failure() {
        let dir = tempdir().unwrap();
        let mounter = CommandMounter::with_binary("/nonexistent/jbod-mount");

        let err = mounter
            .mount(Path::new("/dev/jbod/x"), &dir.path().join("x"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MountFailed { .. }));
    }
}
