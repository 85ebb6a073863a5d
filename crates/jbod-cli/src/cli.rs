//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use jbod_core::MismatchPolicy;
use jbod_model::DriveSelector;

/// jbodctl - Inspect and manage JBOD drive records
#[derive(Parser, Debug)]
#[command(name = "jbodctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Drive registry file
    #[arg(
        long,
        global = true,
        env = "JBOD_REGISTRY",
        default_value = "jbod-drives.json"
    )]
    pub registry: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage drive records
    Drives {
        #[command(subcommand)]
        action: DrivesAction,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   jbodctl completions bash > ~/.local/share/bash-completion/completions/jbodctl
    ///   jbodctl completions zsh > ~/.zfunc/_jbodctl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Drive subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DrivesAction {
    /// List drive records
    List {
        #[command(flatten)]
        selectors: SelectorArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Manage drive access tiers
    AccessTier {
        #[command(subcommand)]
        action: AccessTierAction,
    },

    /// Reconcile a local drive scan into the registry
    ///
    /// The scan file holds a JSON array of drive records as observed on
    /// this node.
    Sync {
        /// Local scan file
        #[arg(long)]
        local: PathBuf,

        /// Host procfs, used to read the active mount table
        #[arg(long, default_value = "/proc")]
        procfs: PathBuf,

        /// Status override for records that may not match the scan
        #[arg(long, value_enum, default_value_t = PolicyArg::Noop)]
        policy: PolicyArg,

        /// Directory of per-filesystem device links
        #[arg(long, default_value = jbod_sys::DEFAULT_DEV_ROOT)]
        dev_root: PathBuf,

        /// Directory under which drives are mounted
        #[arg(long, default_value = jbod_sys::DEFAULT_MOUNT_ROOT)]
        mount_root: PathBuf,

        /// Mount binary to invoke
        #[arg(long, env = "JBOD_MOUNT_BINARY", default_value = "mount")]
        mount_binary: PathBuf,

        /// Output the sync report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Access-tier subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AccessTierAction {
    /// Tag drives with an access tier
    ///
    /// Unavailable drives are never tagged.
    ///
    /// Examples:
    ///   jbodctl drives access-tier set cold --all
    ///   jbodctl drives access-tier set warm --drives '/dev/nvme*'
    ///   jbodctl drives access-tier set hot --nodes node-1,node-2 --status ready
    Set {
        /// Access tier (hot, cold or warm)
        tier: String,

        #[command(flatten)]
        selectors: SelectorArgs,

        /// Print the records that would change without saving them
        #[arg(long)]
        dry_run: bool,
    },
}

/// Glob selectors shared by drive commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorArgs {
    /// Glob selector for node names
    #[arg(short, long, value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Glob selector for drive paths
    #[arg(short, long, value_delimiter = ',')]
    pub drives: Vec<String>,

    /// Glob prefix match for drive status
    #[arg(short, long, value_delimiter = ',')]
    pub status: Vec<String>,

    /// Select every drive
    #[arg(short, long)]
    pub all: bool,
}

impl SelectorArgs {
    pub fn to_selector(&self) -> jbod_model::Result<DriveSelector> {
        DriveSelector::new(&self.nodes, &self.drives, &self.status, self.all)
    }
}

/// Mismatch policy names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Merge without overriding status
    Noop,
    /// Mark records unidentified unless they await a legacy identity upgrade
    Legacy,
    /// Mark every record unidentified
    Unidentified,
}

impl From<PolicyArg> for MismatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Noop => MismatchPolicy::NoOp,
            PolicyArg::Legacy => MismatchPolicy::LegacyMigration,
            PolicyArg::Unidentified => MismatchPolicy::ForceUnidentified,
        }
    }
}
