//! Drive status and the per-status reconciliation rules
//!
//! Every status-dependent decision made during reconciliation or bulk
//! tagging is read from [`DriveStatus::policy`], so each rule is a single
//! row in one table instead of a conditional scattered through the merge
//! and mount code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Lifecycle state of a drive as recorded in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriveStatus {
    /// The record no longer corresponds to a drive the node can identify.
    #[default]
    Unidentified,
    /// Formatted and free to be claimed by the provisioner.
    Available,
    /// At least one volume is attached; capacity is owned by the attach path.
    InUse,
    /// Claimed and mounted, awaiting its first volume.
    Ready,
    /// Not usable (system drive, read-only, too small, ...).
    Unavailable,
}

/// Status-keyed rules consulted by the reconciler and the tagging command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    /// Keep the cluster-side `allocated_capacity` instead of the observed one.
    pub preserve_allocated: bool,
    /// The drive must be mounted under the mount root.
    pub enforce_mount: bool,
    /// Bulk mutations such as access-tier tagging may touch the record.
    pub taggable: bool,
}

impl StatusPolicy {
    const fn row(preserve_allocated: bool, enforce_mount: bool, taggable: bool) -> Self {
        Self {
            preserve_allocated,
            enforce_mount,
            taggable,
        }
    }
}

impl DriveStatus {
    /// All statuses, in declaration order.
    pub const ALL: [DriveStatus; 5] = [
        DriveStatus::Unidentified,
        DriveStatus::Available,
        DriveStatus::InUse,
        DriveStatus::Ready,
        DriveStatus::Unavailable,
    ];

    /// The reconciliation rules for this status.
    pub const fn policy(self) -> StatusPolicy {
        //                                              preserve  mount  taggable
        match self {
            DriveStatus::Unidentified => StatusPolicy::row(false, false, true),
            DriveStatus::Available => StatusPolicy::row(false, false, true),
            DriveStatus::InUse => StatusPolicy::row(true, true, true),
            DriveStatus::Ready => StatusPolicy::row(false, true, true),
            DriveStatus::Unavailable => StatusPolicy::row(false, false, false),
        }
    }

    /// Canonical name as stored in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveStatus::Unidentified => "Unidentified",
            DriveStatus::Available => "Available",
            DriveStatus::InUse => "InUse",
            DriveStatus::Ready => "Ready",
            DriveStatus::Unavailable => "Unavailable",
        }
    }
}

impl FromStr for DriveStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "unidentified" => Ok(DriveStatus::Unidentified),
            "available" => Ok(DriveStatus::Available),
            "inuse" => Ok(DriveStatus::InUse),
            "ready" => Ok(DriveStatus::Ready),
            "unavailable" => Ok(DriveStatus::Unavailable),
            _ => Err(Error::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
