//! jbodctl
//!
//! Operator command-line interface for inspecting drive records, tagging
//! access tiers and running a reconciliation pass from a local scan.

mod cli;
mod commands;
mod error;

use std::sync::Arc;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use jbod_registry::FileRegistry;
use jbod_sys::DrivePaths;

use cli::{AccessTierAction, Cli, Commands, DrivesAction};
use commands::SyncOptions;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = jbod_core::logging::init(level) {
        eprintln!("{}: logging disabled: {e}", "warning".yellow().bold());
    }
    tracing::debug!(registry = %cli.registry.display(), "Using drive registry");

    let registry = FileRegistry::new(&cli.registry);
    match cli.command {
        Commands::Drives { action } => execute_drives(registry, action).await,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "jbodctl", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn execute_drives(registry: FileRegistry, action: DrivesAction) -> Result<()> {
    match action {
        DrivesAction::List { selectors, json } => {
            commands::run_list(&registry, &selectors, json).await
        }
        DrivesAction::AccessTier {
            action:
                AccessTierAction::Set {
                    tier,
                    selectors,
                    dry_run,
                },
        } => commands::run_access_tier_set(&registry, &tier, &selectors, dry_run).await,
        DrivesAction::Sync {
            local,
            procfs,
            policy,
            dev_root,
            mount_root,
            mount_binary,
            json,
        } => {
            let options = SyncOptions {
                local,
                procfs,
                policy: policy.into(),
                paths: DrivePaths::new(dev_root, mount_root),
                mount_binary,
                json,
            };
            commands::run_sync(Arc::new(registry), &options).await
        }
    }
}
