//! Layered driver configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

pub const DEFAULT_IDENTITY: &str = "jbod.csi";
pub const DEFAULT_ENDPOINT: &str = "unix:///csi/csi.sock";
pub const DEFAULT_PROCFS: &str = "/proc";
pub const DEFAULT_REGISTRY: &str = "/var/lib/jbod/drives.json";
const DEFAULT_DOMAIN: &str = "default";

/// Role the binary plays in the CSI deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverMode {
    /// Cluster-wide provisioning service
    Controller,
    /// Per-node service that discovers and mounts drives
    Driver,
}

/// Fully resolved, immutable driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverConfig {
    pub mode: DriverMode,
    pub identity: String,
    pub node_id: String,
    pub rack: String,
    pub zone: String,
    pub region: String,
    pub endpoint: String,
    pub procfs: PathBuf,
    pub registry: PathBuf,
}

/// Optional settings read from a TOML file.
///
/// ```
/// use jbod_driver::{ConfigFile, DriverMode};
///
/// let file = ConfigFile::parse(r#"
/// mode = "driver"
/// node-id = "node-1"
/// zone = "eu-west-1a"
/// "#).unwrap();
///
/// assert_eq!(file.mode, Some(DriverMode::Driver));
/// assert_eq!(file.zone.as_deref(), Some("eu-west-1a"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub mode: Option<DriverMode>,
    pub identity: Option<String>,
    pub node_id: Option<String>,
    pub rack: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub procfs: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }
}

/// Settings given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub controller: bool,
    pub driver: bool,
    pub identity: Option<String>,
    pub node_id: Option<String>,
    pub rack: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub procfs: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

impl ConfigOverrides {
    fn mode(&self) -> Result<Option<DriverMode>> {
        match (self.controller, self.driver) {
            (true, true) => Err(ConfigError::ModeSelection),
            (true, false) => Ok(Some(DriverMode::Controller)),
            (false, true) => Ok(Some(DriverMode::Driver)),
            (false, false) => Ok(None),
        }
    }
}

impl DriverConfig {
    /// Layer `overrides` over `file` over the built-in defaults and validate
    /// the result.
    pub fn resolve(file: Option<ConfigFile>, overrides: &ConfigOverrides) -> Result<Self> {
        let file = file.unwrap_or_default();

        let mode = overrides
            .mode()?
            .or(file.mode)
            .ok_or(ConfigError::ModeSelection)?;

        let pick = |flag: &Option<String>, from_file: Option<String>, default: &str| {
            flag.clone()
                .or(from_file)
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            mode,
            identity: pick(&overrides.identity, file.identity, DEFAULT_IDENTITY),
            node_id: pick(&overrides.node_id, file.node_id, ""),
            rack: pick(&overrides.rack, file.rack, DEFAULT_DOMAIN),
            zone: pick(&overrides.zone, file.zone, DEFAULT_DOMAIN),
            region: pick(&overrides.region, file.region, DEFAULT_DOMAIN),
            endpoint: pick(&overrides.endpoint, file.endpoint, DEFAULT_ENDPOINT),
            procfs: overrides
                .procfs
                .clone()
                .or(file.procfs)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROCFS)),
            registry: overrides
                .registry
                .clone()
                .or(file.registry)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY)),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.mode == DriverMode::Driver && self.node_id.trim().is_empty() {
            return Err(ConfigError::MissingNodeId);
        }
        if !(self.endpoint.starts_with("unix://") || self.endpoint.starts_with("tcp://")) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
            });
        }
        Ok(())
    }
}
