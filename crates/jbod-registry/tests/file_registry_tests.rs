//! Tests for optimistic concurrency on the file-backed registry

use jbod_model::{AccessTier, DriveRecord};
use jbod_registry::{DriveRegistry, FileRegistry, ListFilter};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_from_same_version_admit_one_writer() {
    let dir = tempdir().unwrap();
    let registry = Arc::new(FileRegistry::new(dir.path().join("drives.json")));
    registry
        .insert(DriveRecord::new("d1", "node-1", "/dev/sdb"))
        .unwrap();

    let base = registry.get("d1").await.unwrap();

    let handles: Vec<_> = [AccessTier::Hot, AccessTier::Cold, AccessTier::Warm]
        .into_iter()
        .map(|tier| {
            let registry = Arc::clone(&registry);
            let mut record = base.clone();
            record.access_tier = tier;
            tokio::spawn(async move { registry.update(&record).await })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1, "exactly one writer should win");
    assert_eq!(conflicts, 2);
    assert_eq!(registry.get("d1").await.unwrap().resource_version, "2");
}

#[tokio::test]
async fn reread_after_conflict_succeeds() {
    let dir = tempdir().unwrap();
    let registry = FileRegistry::new(dir.path().join("drives.json"));
    registry
        .insert(DriveRecord::new("d1", "node-1", "/dev/sdb"))
        .unwrap();

    let stale = registry.get("d1").await.unwrap();
    registry.update(&stale).await.unwrap();
    assert!(registry.update(&stale).await.unwrap_err().is_conflict());

    let mut fresh = registry.get("d1").await.unwrap();
    fresh.access_tier = AccessTier::Cold;
    let updated = registry.update(&fresh).await.unwrap();
    assert_eq!(updated.resource_version, "3");
}

#[tokio::test]
async fn list_filters_by_node() {
    let dir = tempdir().unwrap();
    let registry = FileRegistry::new(dir.path().join("nested").join("drives.json"));
    for (name, node) in [("a", "node-1"), ("b", "node-2"), ("c", "node-1")] {
        registry
            .insert(DriveRecord::new(name, node, "/dev/sdb"))
            .unwrap();
    }

    let names: Vec<_> = registry
        .list(&ListFilter::node("node-1"))
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["a", "c"]);
}
