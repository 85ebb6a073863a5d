//! Drive record registry for the JBOD drive manager
//!
//! The registry is the cluster-wide store of [`DriveRecord`]s. Writes use
//! optimistic concurrency: every record carries the `resource_version` it
//! was read at, and an update whose version is stale is rejected with
//! [`Error::Conflict`] instead of waiting on a lock.
//!
//! Two implementations are provided:
//!
//! - [`MemoryRegistry`]: in-process, for tests and embedding
//! - [`FileRegistry`]: a JSON document on disk guarded by advisory locks

pub mod error;
pub mod file;
pub mod memory;

pub use error::{Error, Result};
pub use file::FileRegistry;
pub use memory::MemoryRegistry;

use async_trait::async_trait;
use jbod_model::DriveRecord;

/// Narrows a [`DriveRegistry::list`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only records owned by this node.
    pub node_name: Option<String>,
}

impl ListFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn node(name: impl Into<String>) -> Self {
        Self {
            node_name: Some(name.into()),
        }
    }

    pub fn matches(&self, record: &DriveRecord) -> bool {
        self.node_name
            .as_deref()
            .is_none_or(|node| record.node_name == node)
    }
}

/// Cluster-wide store of drive records.
#[async_trait]
pub trait DriveRegistry: Send + Sync {
    /// Fetch a record by name, with its current `resource_version`.
    async fn get(&self, name: &str) -> Result<DriveRecord>;

    /// Replace the stored record.
    ///
    /// Fails with [`Error::Conflict`] when `record.resource_version` does not
    /// match the stored version. On success the stored copy, carrying its new
    /// version, is returned. A single update is atomic.
    async fn update(&self, record: &DriveRecord) -> Result<DriveRecord>;

    /// All records accepted by `filter`, ordered by name.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<DriveRecord>>;
}

/// Version following `current`. Unparseable versions restart the sequence.
pub(crate) fn next_version(current: &str) -> String {
    (current.parse::<u64>().unwrap_or(0) + 1).to_string()
}
