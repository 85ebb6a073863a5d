//! CSI driver bootstrap for the JBOD drive manager
//!
//! Resolves the runtime configuration of the `jbod-csi` binary: which mode
//! it runs in, the node and failure-domain labels it advertises, the CSI
//! endpoint it listens on and where it finds host mount information.
//!
//! Configuration is layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file given with `--config`
//! 3. Command-line flags and `JBOD_*` environment variables

pub mod config;
pub mod error;

pub use config::{ConfigFile, ConfigOverrides, DriverConfig, DriverMode};
pub use error::{ConfigError, Result};
