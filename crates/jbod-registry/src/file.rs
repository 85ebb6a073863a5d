//! File-backed drive registry
//!
//! All records live in a single JSON document. A sidecar `<file>.lock` is
//! locked shared for reads and exclusively for read-modify-write cycles, and
//! the document itself is replaced by write-to-temp-then-rename so readers
//! never observe a partial write.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use jbod_model::DriveRecord;
use serde::{Deserialize, Serialize};

use crate::{DriveRegistry, Error, ListFilter, Result, next_version};

const DOCUMENT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryDocument {
    version: String,
    #[serde(default)]
    drives: BTreeMap<String, DriveRecord>,
}

impl Default for RegistryDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            drives: BTreeMap::new(),
        }
    }
}

/// Registry persisted as a JSON document.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Open the registry at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a record, assigning its first resource version.
    pub fn insert(&self, mut record: DriveRecord) -> Result<DriveRecord> {
        self.modify(|doc| {
            if doc.drives.contains_key(&record.name) {
                return Err(Error::AlreadyExists {
                    name: record.name.clone(),
                });
            }
            record.resource_version = next_version("");
            doc.drives.insert(record.name.clone(), record.clone());
            Ok(record)
        })
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn open_lock(&self) -> Result<File> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))
    }

    fn read_document(&self) -> Result<RegistryDocument> {
        if !self.path.exists() {
            return Ok(RegistryDocument::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| Error::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_document(&self, doc: &RegistryDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(format!(".{}.tmp", std::process::id()));
        let temp_path = PathBuf::from(temp_name);

        let mut temp = File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;
        temp.sync_all().map_err(|e| Error::io(&temp_path, e))?;

        fs::rename(&temp_path, &self.path).map_err(|e| Error::io(&self.path, e))
    }

    /// Read the document under a shared lock.
    fn snapshot(&self) -> Result<RegistryDocument> {
        let lock = self.open_lock()?;
        FileExt::lock_shared(&lock).map_err(|_| Error::LockFailed {
            path: self.lock_path(),
        })?;
        // Lock released when `lock` is dropped
        self.read_document()
    }

    /// Read, mutate and write the document under an exclusive lock. Nothing
    /// is written when `f` fails.
    fn modify<T>(&self, f: impl FnOnce(&mut RegistryDocument) -> Result<T>) -> Result<T> {
        let lock = self.open_lock()?;
        FileExt::lock_exclusive(&lock).map_err(|_| Error::LockFailed {
            path: self.lock_path(),
        })?;

        let mut doc = self.read_document()?;
        let value = f(&mut doc)?;
        self.write_document(&doc)?;
        Ok(value)
    }

    fn get_blocking(&self, name: &str) -> Result<DriveRecord> {
        self.snapshot()?
            .drives
            .remove(name)
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    fn update_blocking(&self, record: DriveRecord) -> Result<DriveRecord> {
        self.modify(|doc| {
            let stored = doc.drives.get_mut(&record.name).ok_or_else(|| Error::NotFound {
                name: record.name.clone(),
            })?;

            if stored.resource_version != record.resource_version {
                return Err(Error::Conflict {
                    name: record.name.clone(),
                    expected: record.resource_version.clone(),
                    actual: stored.resource_version.clone(),
                });
            }

            let mut updated = record;
            updated.resource_version = next_version(&stored.resource_version);
            *stored = updated.clone();
            Ok(updated)
        })
    }

    fn list_blocking(&self, filter: &ListFilter) -> Result<Vec<DriveRecord>> {
        Ok(self
            .snapshot()?
            .drives
            .into_values()
            .filter(|r| filter.matches(r))
            .collect())
    }
}

/// Run blocking file work off the async executor.
async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> Result<T> + Send + 'static,
) -> Result<T> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::backend(format!("registry task failed: {e}")))?
}

#[async_trait]
impl DriveRegistry for FileRegistry {
    async fn get(&self, name: &str) -> Result<DriveRecord> {
        let this = self.clone();
        let name = name.to_string();
        blocking(move || this.get_blocking(&name)).await
    }

    async fn update(&self, record: &DriveRecord) -> Result<DriveRecord> {
        let this = self.clone();
        let record = record.clone();
        let updated = blocking(move || this.update_blocking(record)).await?;
        tracing::trace!(drive = %updated.name, version = %updated.resource_version, "Registry record updated");
        Ok(updated)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<DriveRecord>> {
        let this = self.clone();
        let filter = filter.clone();
        blocking(move || this.list_blocking(&filter)).await
    }
}
