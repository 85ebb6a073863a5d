//! Mount enforcement for claimed drives

use std::path::PathBuf;
use std::sync::Arc;

use jbod_model::{ConditionReason, ConditionType, DriveRecord};
use jbod_sys::{DrivePaths, MountTable, Mounter};

/// What [`MountEnforcer::ensure_mounted`] did for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountAction {
    /// The drive status does not call for a mount.
    NotRequired,
    /// The expected source already appears in the mount table.
    AlreadyMounted,
    /// The drive was mounted at `target`.
    Mounted { target: PathBuf },
    /// Mounting failed; a `Mounted = false` condition was recorded.
    Failed { message: String },
}

impl MountAction {
    pub fn is_failed(&self) -> bool {
        matches!(self, MountAction::Failed { .. })
    }
}

/// Ensures that drives whose status requires it are mounted under the
/// managed mount root.
#[derive(Clone)]
pub struct MountEnforcer {
    mounter: Arc<dyn Mounter>,
    paths: DrivePaths,
}

impl std::fmt::Debug for MountEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountEnforcer")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl MountEnforcer {
    pub fn new(mounter: Arc<dyn Mounter>, paths: DrivePaths) -> Self {
        Self { mounter, paths }
    }

    pub fn with_paths(self, paths: DrivePaths) -> Self {
        Self { paths, ..self }
    }

    pub fn paths(&self) -> &DrivePaths {
        &self.paths
    }

    /// Mount `record` if its status requires it and the expected source is
    /// not in `mounts`.
    ///
    /// Failure never propagates: it is written to the record as a
    /// `Mounted = false` condition and returned as [`MountAction::Failed`].
    pub async fn ensure_mounted(&self, record: &mut DriveRecord, mounts: &MountTable) -> MountAction {
        if !record.drive_status.policy().enforce_mount {
            return MountAction::NotRequired;
        }

        if record.filesystem_uuid.is_empty() {
            return fail(record, "filesystem UUID is not known".to_string());
        }

        let source = self.paths.source_for(&record.filesystem_uuid);
        if mounts.is_source_mounted(&source) {
            return MountAction::AlreadyMounted;
        }

        let target = self.paths.target_for(&record.filesystem_uuid);
        match self.mounter.mount(&source, &target, &[]).await {
            Ok(()) => {
                record.mountpoint = target.to_string_lossy().into_owned();
                MountAction::Mounted { target }
            }
            Err(e) => fail(record, e.to_string()),
        }
    }
}

fn fail(record: &mut DriveRecord, message: String) -> MountAction {
    record.conditions.set(
        ConditionType::Mounted,
        false,
        ConditionReason::Initialized,
        message.clone(),
    );
    MountAction::Failed { message }
}
