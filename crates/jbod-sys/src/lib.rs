//! Node-local OS boundary for the JBOD drive manager
//!
//! Provides the device and mount path layout, point-in-time mount table
//! snapshots and the mount primitive used to bring claimed drives online.

pub mod error;
pub mod mounter;
pub mod mounts;
pub mod paths;

pub use error::{Error, Result};
pub use mounter::{CommandMounter, Mounter};
pub use mounts::{MountEntry, MountTable};
pub use paths::{DEFAULT_DEV_ROOT, DEFAULT_MOUNT_ROOT, DrivePaths};
