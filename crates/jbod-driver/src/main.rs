//! jbod-csi
//!
//! CSI driver for provisioning volumes from JBODs directly. This binary
//! resolves and validates its runtime configuration, then prints it as JSON
//! on stdout. Logs go to stderr.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `info`)
//! - `JBOD_*`: Fallback for each flag, e.g. `JBOD_NODE_ID`

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use jbod_driver::{ConfigFile, ConfigOverrides, DriverConfig};

/// CSI driver for provisioning from JBOD(s) directly
#[derive(Parser, Debug)]
#[command(name = "jbod-csi")]
#[command(version, about)]
struct Args {
    /// Run in controller mode
    #[arg(long, env = "JBOD_CONTROLLER")]
    controller: bool,

    /// Run in driver (node) mode
    #[arg(long, env = "JBOD_DRIVER")]
    driver: bool,

    /// TOML configuration file
    #[arg(long, env = "JBOD_CONFIG")]
    config: Option<PathBuf>,

    /// Identity of this driver
    #[arg(short, long, env = "JBOD_IDENTITY")]
    identity: Option<String>,

    /// Identity of the node this driver runs on
    #[arg(short, long, env = "JBOD_NODE_ID")]
    node_id: Option<String>,

    /// Rack this driver runs in
    #[arg(long, env = "JBOD_RACK")]
    rack: Option<String>,

    /// Zone this driver runs in
    #[arg(long, env = "JBOD_ZONE")]
    zone: Option<String>,

    /// Region this driver runs in
    #[arg(long, env = "JBOD_REGION")]
    region: Option<String>,

    /// Endpoint the CSI service listens on
    #[arg(short, long, env = "JBOD_ENDPOINT")]
    endpoint: Option<String>,

    /// Path to the host /proc for reading mount information
    #[arg(long, env = "JBOD_PROCFS")]
    procfs: Option<PathBuf>,

    /// Drive registry file
    #[arg(long, env = "JBOD_REGISTRY")]
    registry: Option<PathBuf>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            controller: args.controller,
            driver: args.driver,
            identity: args.identity,
            node_id: args.node_id,
            rack: args.rack,
            zone: args.zone,
            region: args.region,
            endpoint: args.endpoint,
            procfs: args.procfs,
            registry: args.registry,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    jbod_core::logging::init("info")?;

    let args = Args::parse();
    let file = args.config.as_deref().map(ConfigFile::load).transpose()?;
    let config = DriverConfig::resolve(file, &args.into())?;

    tracing::info!(
        mode = ?config.mode,
        node = %config.node_id,
        endpoint = %config.endpoint,
        "Driver configuration resolved"
    );
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
