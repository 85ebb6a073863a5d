//! Registry fixtures: conflict injection, latency injection and file-backed
//! registries in a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use jbod_model::DriveRecord;
use jbod_registry::{DriveRegistry, FileRegistry, ListFilter, MemoryRegistry, Result};
use tempfile::TempDir;

/// In-memory registry where a competing writer slips in before each of the
/// first `conflicts` updates, so those updates fail with a genuine version
/// conflict.
#[derive(Debug)]
pub struct ScriptedConflictRegistry {
    inner: MemoryRegistry,
    remaining_conflicts: AtomicU32,
    gets: AtomicU32,
    updates: AtomicU32,
}

impl ScriptedConflictRegistry {
    pub fn new(records: impl IntoIterator<Item = DriveRecord>, conflicts: u32) -> Self {
        Self {
            inner: MemoryRegistry::with_records(records).unwrap(),
            remaining_conflicts: AtomicU32::new(conflicts),
            gets: AtomicU32::new(0),
            updates: AtomicU32::new(0),
        }
    }

    /// Number of `get` calls served so far.
    pub fn gets(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `update` calls received so far, including rejected ones.
    pub fn updates(&self) -> u32 {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryRegistry {
        &self.inner
    }
}

#[async_trait]
impl DriveRegistry for ScriptedConflictRegistry {
    async fn get(&self, name: &str) -> Result<DriveRecord> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(name).await
    }

    async fn update(&self, record: &DriveRecord) -> Result<DriveRecord> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let inject = self
            .remaining_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if inject {
            let current = self.inner.get(&record.name).await?;
            self.inner.update(&current).await?;
        }
        self.inner.update(record).await
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<DriveRecord>> {
        self.inner.list(filter).await
    }
}

/// In-memory registry that sleeps before serving each call.
#[derive(Debug)]
pub struct SlowRegistry {
    inner: MemoryRegistry,
    delay: Duration,
}

impl SlowRegistry {
    pub fn new(records: impl IntoIterator<Item = DriveRecord>, delay: Duration) -> Self {
        Self {
            inner: MemoryRegistry::with_records(records).unwrap(),
            delay,
        }
    }

    pub fn inner(&self) -> &MemoryRegistry {
        &self.inner
    }
}

#[async_trait]
impl DriveRegistry for SlowRegistry {
    async fn get(&self, name: &str) -> Result<DriveRecord> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(name).await
    }

    async fn update(&self, record: &DriveRecord) -> Result<DriveRecord> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(record).await
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<DriveRecord>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list(filter).await
    }
}

/// A [`FileRegistry`] document in its own temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestRegistryFile {
    temp_dir: TempDir,
    path: PathBuf,
}

impl TestRegistryFile {
    /// Create the registry file seeded with `records`.
    pub fn new(records: impl IntoIterator<Item = DriveRecord>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("drives.json");
        let registry = FileRegistry::new(&path);
        for record in records {
            registry.insert(record).unwrap();
        }
        Self { temp_dir, path }
    }

    /// Registry fixture with no records and no document on disk yet.
    pub fn empty() -> Self {
        Self::new(Vec::<DriveRecord>::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn registry(&self) -> FileRegistry {
        FileRegistry::new(&self.path)
    }

    /// Read one record straight from the document, bypassing the registry.
    pub fn record(&self, name: &str) -> DriveRecord {
        let content = std::fs::read_to_string(&self.path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        serde_json::from_value(doc["drives"][name].clone())
            .unwrap_or_else(|e| panic!("record {name} not readable: {e}"))
    }

    /// Write `content` to a file next to the registry and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}
