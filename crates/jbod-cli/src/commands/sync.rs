//! `drives sync`

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use jbod_core::{MismatchPolicy, Reconciler};
use jbod_model::DriveRecord;
use jbod_registry::DriveRegistry;
use jbod_sys::{CommandMounter, DrivePaths, MountTable};

use crate::error::{CliError, Result};

/// Inputs for one reconciliation pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub local: PathBuf,
    pub procfs: PathBuf,
    pub policy: MismatchPolicy,
    pub paths: DrivePaths,
    pub mount_binary: PathBuf,
    pub json: bool,
}

/// Reconcile every drive in the scan file against the registry.
pub async fn run_sync(registry: Arc<dyn DriveRegistry>, options: &SyncOptions) -> Result<()> {
    let content = tokio::fs::read_to_string(&options.local)
        .await
        .map_err(|e| CliError::user(format!("Cannot read scan file {}: {e}", options.local.display())))?;
    let drives: Vec<DriveRecord> = serde_json::from_str(&content)?;
    let mounts = MountTable::load(&options.procfs)?;

    tracing::debug!(
        drives = drives.len(),
        mounts = mounts.len(),
        policy = ?options.policy,
        "Starting drive sync"
    );

    let reconciler = Reconciler::new(
        registry,
        Arc::new(CommandMounter::with_binary(&options.mount_binary)),
    )
    .with_paths(options.paths.clone())
    .with_mounts(mounts);

    let batch: Vec<_> = drives.into_iter().map(|d| (d, options.policy)).collect();
    let report = reconciler.sync_drives(&batch).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for name in &report.updated {
            println!("{} {}", "updated".green(), name);
        }
        for name in &report.skipped {
            println!("{} {} (no registry record)", "skipped".dimmed(), name);
        }
        for failure in &report.mount_failures {
            println!("{} {}: {}", "not mounted".yellow(), failure.name, failure.message);
        }
        for failure in &report.errors {
            println!("{} {}: {}", "failed".red(), failure.name, failure.message);
        }
    }

    if report.has_errors() {
        return Err(CliError::user(format!(
            "{} drive(s) failed to reconcile",
            report.errors.len()
        )));
    }
    Ok(())
}
