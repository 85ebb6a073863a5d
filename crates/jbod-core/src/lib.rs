//! Drive state reconciliation engine
//!
//! This crate merges freshly observed local drives into the cluster-wide
//! drive registry, implementing:
//!
//! - **Merge policy**: which fields are local-authoritative, which are
//!   preserved from the cluster record, and how capacity is re-derived
//! - **Mismatch policies**: status overrides for records that may no longer
//!   correspond to a live drive, including legacy-named records that are
//!   still completing their identity upgrade
//! - **Mount enforcement**: claimed drives are mounted where expected, with
//!   failures reported as conditions rather than errors
//! - **Reconciler**: fetch, merge, enforce and persist under optimistic
//!   concurrency with bounded conflict retry
//! - **Access-tier tagging**: bulk selection and tagging of drive records
//!
//! # Architecture
//!
//! ```text
//!                 jbod-cli / jbod-driver
//!                          |
//!                      jbod-core
//!                          |
//!         +----------------+----------------+
//!         |                |                |
//!     jbod-model     jbod-registry      jbod-sys
//! ```

pub mod error;
pub mod logging;
pub mod merge;
pub mod mount;
pub mod reconcile;
pub mod retry;
pub mod tagging;

pub use error::{Error, Result};
pub use merge::{MismatchPolicy, merge};
pub use mount::{MountAction, MountEnforcer};
pub use reconcile::{DriveFailure, ReconcileOutcome, Reconciler, SyncReport};
pub use retry::{RetryPolicy, retry_on_conflict};
pub use tagging::{TagReport, TagRequest, set_access_tier};
