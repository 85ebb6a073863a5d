//! Shared test utilities for the JBOD drive manager workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`drive`]: [`DriveBuilder`] for drive records with sensible defaults
//! - [`mounter`]: [`RecordingMounter`], a mount primitive that records calls
//! - [`registry`]: registries that inject conflicts or delays, and
//!   file-backed registry fixtures

pub mod drive;
pub mod mounter;
pub mod registry;

pub use drive::DriveBuilder;
pub use mounter::{MountCall, RecordingMounter};
pub use registry::{ScriptedConflictRegistry, SlowRegistry, TestRegistryFile};
