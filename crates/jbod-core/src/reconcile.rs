//! Reconciliation loop
//!
//! One call to [`Reconciler::reconcile_one`] runs the transaction
//! fetch → merge → enforce mount → persist for a single drive identity,
//! re-running it from the fetch whenever the persist hits a version
//! conflict. Drives are independent: [`Reconciler::sync_drives`] reports a
//! failure for one drive and carries on with the next.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use jbod_model::DriveRecord;
use jbod_registry::DriveRegistry;
use jbod_sys::{DrivePaths, MountTable, Mounter};
use serde::Serialize;

use crate::merge::{MismatchPolicy, merge};
use crate::mount::{MountAction, MountEnforcer};
use crate::retry::{RetryPolicy, retry_on_conflict};
use crate::{Error, Result};

/// Result of reconciling one local drive.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// The merged record was persisted.
    Updated {
        record: DriveRecord,
        mount: MountAction,
    },
    /// No cluster record exists yet for this identity.
    Skipped,
}

/// One drive that could not be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveFailure {
    pub name: String,
    pub message: String,
}

/// Per-drive results of a [`Reconciler::sync_drives`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    /// Drives persisted with a `Mounted = false` condition.
    pub mount_failures: Vec<DriveFailure>,
    pub errors: Vec<DriveFailure>,
}

impl SyncReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Merges locally observed drives into the registry.
///
/// The mount table is a snapshot taken by the caller; refresh it between
/// discovery passes with [`Reconciler::set_mounts`].
#[derive(Clone)]
pub struct Reconciler {
    registry: Arc<dyn DriveRegistry>,
    enforcer: MountEnforcer,
    mounts: MountTable,
    retry: RetryPolicy,
}

impl Reconciler {
    pub fn new(registry: Arc<dyn DriveRegistry>, mounter: Arc<dyn Mounter>) -> Self {
        Self {
            registry,
            enforcer: MountEnforcer::new(mounter, DrivePaths::default()),
            mounts: MountTable::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_paths(mut self, paths: DrivePaths) -> Self {
        self.enforcer = self.enforcer.with_paths(paths);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_mounts(mut self, mounts: MountTable) -> Self {
        self.mounts = mounts;
        self
    }

    pub fn set_mounts(&mut self, mounts: MountTable) {
        self.mounts = mounts;
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Reconcile one locally discovered drive.
    ///
    /// A drive with no cluster record yields [`ReconcileOutcome::Skipped`].
    /// Conflicts are retried per the retry policy; any other registry error
    /// is returned without retry.
    pub async fn reconcile_one(
        &self,
        local: &DriveRecord,
        policy: MismatchPolicy,
    ) -> Result<ReconcileOutcome> {
        let name = local.name.as_str();
        // The snapshot does not see mounts made by an earlier attempt.
        let mounted = &OnceLock::<PathBuf>::new();

        let result = retry_on_conflict(&self.retry, name, move |attempt| async move {
            let existing = self.registry.get(name).await?;
            let mut merged = merge(existing, local, policy);

            let mount = match mounted.get() {
                Some(target) if merged.drive_status.policy().enforce_mount => {
                    merged.mountpoint = target.to_string_lossy().into_owned();
                    MountAction::Mounted {
                        target: target.clone(),
                    }
                }
                _ => self.enforcer.ensure_mounted(&mut merged, &self.mounts).await,
            };
            if let MountAction::Mounted { target } = &mount {
                let _ = mounted.set(target.clone());
            }
            if let MountAction::Failed { message } = &mount {
                tracing::debug!(drive = %name, attempt, error = %message, "Mount failed, recorded as condition");
            }

            let record = self.registry.update(&merged).await?;
            Ok::<_, Error>((record, mount))
        })
        .await;

        match result {
            Ok((record, mount)) => {
                tracing::debug!(drive = %name, status = %record.drive_status, "Drive reconciled");
                Ok(ReconcileOutcome::Updated { record, mount })
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(drive = %name, "No cluster record yet, skipping");
                Ok(ReconcileOutcome::Skipped)
            }
            Err(e) => {
                tracing::warn!(drive = %name, error = %e, "Drive reconciliation failed");
                Err(e)
            }
        }
    }

    /// Reconcile each drive in turn and collect per-drive results.
    pub async fn sync_drives(&self, drives: &[(DriveRecord, MismatchPolicy)]) -> SyncReport {
        let mut report = SyncReport::default();
        for (local, policy) in drives {
            match self.reconcile_one(local, *policy).await {
                Ok(ReconcileOutcome::Updated { record, mount }) => {
                    if let MountAction::Failed { message } = mount {
                        report.mount_failures.push(DriveFailure {
                            name: record.name.clone(),
                            message,
                        });
                    }
                    report.updated.push(record.name);
                }
                Ok(ReconcileOutcome::Skipped) => report.skipped.push(local.name.clone()),
                Err(e) => report.errors.push(DriveFailure {
                    name: local.name.clone(),
                    message: e.to_string(),
                }),
            }
        }

        tracing::info!(
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            failed = report.errors.len(),
            "Drive sync complete"
        );
        report
    }
}
