//! In-process drive registry

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use jbod_model::DriveRecord;

use crate::{DriveRegistry, Error, ListFilter, Result, next_version};

/// Registry held in memory. Cheap to construct; shares nothing between
/// instances.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    drives: Mutex<BTreeMap<String, DriveRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = DriveRecord>) -> Result<Self> {
        let registry = Self::new();
        for record in records {
            registry.insert(record)?;
        }
        Ok(registry)
    }

    /// Create a record, assigning its first resource version.
    pub fn insert(&self, mut record: DriveRecord) -> Result<DriveRecord> {
        let mut drives = self.lock()?;
        if drives.contains_key(&record.name) {
            return Err(Error::AlreadyExists { name: record.name });
        }
        record.resource_version = next_version("");
        drives.insert(record.name.clone(), record.clone());
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, DriveRecord>>> {
        self.drives
            .lock()
            .map_err(|_| Error::backend("memory registry lock poisoned"))
    }
}

#[async_trait]
impl DriveRegistry for MemoryRegistry {
    async fn get(&self, name: &str) -> Result<DriveRecord> {
        self.lock()?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    async fn update(&self, record: &DriveRecord) -> Result<DriveRecord> {
        let mut drives = self.lock()?;
        let stored = drives.get_mut(&record.name).ok_or_else(|| Error::NotFound {
            name: record.name.clone(),
        })?;

        if stored.resource_version != record.resource_version {
            return Err(Error::Conflict {
                name: record.name.clone(),
                expected: record.resource_version.clone(),
                actual: stored.resource_version.clone(),
            });
        }

        let mut updated = record.clone();
        updated.resource_version = next_version(&stored.resource_version);
        *stored = updated.clone();
        Ok(updated)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<DriveRecord>> {
        Ok(self
            .lock()?
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}
