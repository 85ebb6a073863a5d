//! The cluster-side drive record

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::naming::legacy_drive_name;
use crate::{Conditions, DriveStatus, Error};

/// Operator-assigned scheduling class of a drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessTier {
    Hot,
    Cold,
    Warm,
    #[default]
    Unknown,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Hot => "Hot",
            AccessTier::Cold => "Cold",
            AccessTier::Warm => "Warm",
            AccessTier::Unknown => "Unknown",
        }
    }
}

/// Parses an operator-supplied tier. Only the settable tiers are accepted;
/// `Unknown` is the unset state and cannot be assigned.
impl FromStr for AccessTier {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(AccessTier::Hot),
            "cold" => Ok(AccessTier::Cold),
            "warm" => Ok(AccessTier::Warm),
            _ => Err(Error::InvalidAccessTier {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative cluster record for one drive on one node.
///
/// `name` is assigned by the registry and never changes. `resource_version`
/// is the optimistic-concurrency token returned by the last read; a write
/// carrying a stale token is rejected by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveRecord {
    pub name: String,
    pub resource_version: String,

    // Identity and hardware
    pub node_name: String,
    pub path: String,
    pub current_path: String,
    pub serial_number: String,
    pub filesystem_uuid: String,
    pub partition_uuid: String,
    pub major_number: u32,
    pub minor_number: u32,
    pub model_number: String,
    pub physical_block_size: i64,
    pub logical_block_size: i64,
    pub root_partition: String,
    pub partition_number: u32,

    // Filesystem and mount
    pub filesystem: String,
    pub mountpoint: String,
    pub mount_options: Vec<String>,

    // Capacity, in bytes. `free_capacity` may go negative when a drive
    // shrinks underneath existing allocations.
    pub total_capacity: i64,
    pub allocated_capacity: i64,
    pub free_capacity: i64,

    pub drive_status: DriveStatus,
    pub access_tier: AccessTier,
    pub conditions: Conditions,
}

impl DriveRecord {
    pub fn new(
        name: impl Into<String>,
        node_name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node_name: node_name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Whether any persistent hardware identifier has been recorded.
    pub fn has_hardware_identity(&self) -> bool {
        !self.serial_number.is_empty()
            || !self.filesystem_uuid.is_empty()
            || !self.partition_uuid.is_empty()
            || self.major_number != 0
            || self.minor_number != 0
    }

    /// Whether the record name was derived from node and path alone.
    pub fn is_legacy_named(&self) -> bool {
        self.name == legacy_drive_name(&self.node_name, &self.path)
    }

    /// A record created under the node+path naming scheme that has not yet
    /// been populated with hardware identifiers.
    pub fn is_pending_identity_upgrade(&self) -> bool {
        self.is_legacy_named() && !self.has_hardware_identity()
    }
}
