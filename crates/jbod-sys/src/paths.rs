//! Device and mount path layout for managed drives.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory holding the stable device links, one per filesystem UUID.
pub const DEFAULT_DEV_ROOT: &str = "/dev/jbod";

/// Directory under which claimed drives are mounted, one per filesystem UUID.
pub const DEFAULT_MOUNT_ROOT: &str = "/var/lib/jbod/mnt";

/// Where a drive's device link lives and where it gets mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrivePaths {
    pub dev_root: PathBuf,
    pub mount_root: PathBuf,
}

impl Default for DrivePaths {
    fn default() -> Self {
        Self {
            dev_root: PathBuf::from(DEFAULT_DEV_ROOT),
            mount_root: PathBuf::from(DEFAULT_MOUNT_ROOT),
        }
    }
}

impl DrivePaths {
    pub fn new(dev_root: impl AsRef<Path>, mount_root: impl AsRef<Path>) -> Self {
        Self {
            dev_root: dev_root.as_ref().to_path_buf(),
            mount_root: mount_root.as_ref().to_path_buf(),
        }
    }

    /// Mount source for the filesystem with the given UUID.
    pub fn source_for(&self, filesystem_uuid: &str) -> PathBuf {
        self.dev_root.join(filesystem_uuid)
    }

    /// Mount target for the filesystem with the given UUID.
    pub fn target_for(&self, filesystem_uuid: &str) -> PathBuf {
        self.mount_root.join(filesystem_uuid)
    }
}
