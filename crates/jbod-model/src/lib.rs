//! Drive record schema for the JBOD drive manager
//!
//! Provides the cluster-side [`DriveRecord`] and the vocabulary used to
//! reason about it: drive status and its transition table, access tiers,
//! status conditions, legacy record naming and glob-based selection.

pub mod condition;
pub mod drive;
pub mod error;
pub mod naming;
pub mod selector;
pub mod status;

pub use condition::{Condition, ConditionReason, ConditionType, Conditions};
pub use drive::{AccessTier, DriveRecord};
pub use error::{Error, Result};
pub use naming::legacy_drive_name;
pub use selector::DriveSelector;
pub use status::{DriveStatus, StatusPolicy};
