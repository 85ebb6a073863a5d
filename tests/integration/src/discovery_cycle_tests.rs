//! End-to-end discovery cycles
//!
//! These tests drive the reconciler and the tagging entry point against a
//! file-backed registry, the way a node agent and an operator share it.

use std::sync::Arc;

use jbod_core::{MismatchPolicy, Reconciler, RetryPolicy, TagRequest, set_access_tier};
use jbod_model::{AccessTier, DriveRecord, DriveSelector, DriveStatus, legacy_drive_name};
use jbod_registry::{DriveRegistry, FileRegistry};
use jbod_sys::{DrivePaths, MountTable};
use jbod_test_utils::{DriveBuilder, RecordingMounter, TestRegistryFile};
use pretty_assertions::assert_eq;

fn paths() -> DrivePaths {
    DrivePaths::new("/dev/jbod", "/var/lib/jbod/mnt")
}

/// Drives as the scanner reports them: identity and capacity only.
fn scan(names: &[&str]) -> Vec<DriveRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            DriveBuilder::new(name)
                .path(&format!("/dev/sd{}", (b'b' + i as u8) as char))
                .identified(&format!("SER{i}"), &format!("fs-{name}"))
                .capacity(4096, 0)
                .filesystem("xfs")
                .build()
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reconciles_of_distinct_drives_all_land() {
    let names = ["d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7"];
    let fixture = TestRegistryFile::new(names.iter().map(|n| {
        DriveBuilder::new(n)
            .status(DriveStatus::InUse)
            .capacity(1024, 512)
            .build()
    }));
    let mounter = Arc::new(RecordingMounter::new());
    let reconciler = Arc::new(
        Reconciler::new(Arc::new(fixture.registry()), mounter.clone())
            .with_paths(paths())
            .with_retry(RetryPolicy::immediate(10)),
    );

    let handles: Vec<_> = scan(&names)
        .into_iter()
        .map(|local| {
            let reconciler = Arc::clone(&reconciler);
            tokio::spawn(async move { reconciler.reconcile_one(&local, MismatchPolicy::NoOp).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for name in names {
        let record = fixture.record(name);
        assert_eq!(record.resource_version, "2");
        assert_eq!(record.filesystem, "xfs");
        assert_eq!(record.allocated_capacity, 512);
        assert_eq!(record.free_capacity, 4096 - 512);
        assert_eq!(record.mountpoint, format!("/var/lib/jbod/mnt/fs-{name}"));
    }
    assert_eq!(mounter.calls().len(), names.len());
}

#[tokio::test]
async fn operator_tier_survives_rediscovery() {
    let fixture = TestRegistryFile::new([DriveBuilder::new("d0")
        .node("nodeX")
        .status(DriveStatus::Available)
        .build()]);
    let registry = fixture.registry();

    let request = TagRequest::new(
        "warm",
        DriveSelector::new(&["nodeX".to_string()], &[], &[], false).unwrap(),
        false,
    )
    .unwrap();
    set_access_tier(&registry, &request).await.unwrap();

    let mut local = scan(&["d0"]).remove(0);
    local.node_name = "nodeX".to_string();
    let reconciler = Reconciler::new(Arc::new(registry), Arc::new(RecordingMounter::new()));
    reconciler
        .reconcile_one(&local, MismatchPolicy::NoOp)
        .await
        .unwrap();

    let record = fixture.record("d0");
    assert_eq!(record.access_tier, AccessTier::Warm);
    assert_eq!(record.serial_number, "SER0");
    assert_eq!(record.resource_version, "3");
}

#[tokio::test]
async fn legacy_records_upgrade_across_two_cycles() {
    let name = legacy_drive_name("node-1", "/dev/sdb");
    let fixture = TestRegistryFile::new([DriveBuilder::new(&name)
        .status(DriveStatus::Available)
        .capacity(4096, 0)
        .build()]);
    let reconciler = Reconciler::new(
        Arc::new(fixture.registry()),
        Arc::new(RecordingMounter::new()),
    );

    // First cycle: the scanner cannot read identity yet
    let bare = DriveBuilder::new(&name).capacity(4096, 0).build();
    reconciler
        .reconcile_one(&bare, MismatchPolicy::LegacyMigration)
        .await
        .unwrap();
    assert_eq!(fixture.record(&name).drive_status, DriveStatus::Available);

    // Second cycle: identity is now populated on the record
    let identified = DriveBuilder::new(&name)
        .identified("SER0", "fs-legacy")
        .capacity(4096, 0)
        .build();
    reconciler
        .reconcile_one(&identified, MismatchPolicy::NoOp)
        .await
        .unwrap();
    assert_eq!(fixture.record(&name).serial_number, "SER0");

    // A legacy pass over an upgraded record marks it unidentified
    reconciler
        .reconcile_one(&identified, MismatchPolicy::LegacyMigration)
        .await
        .unwrap();
    assert_eq!(fixture.record(&name).drive_status, DriveStatus::Unidentified);
}

#[tokio::test]
async fn mount_table_from_procfs_prevents_remount() {
    let fixture = TestRegistryFile::new([DriveBuilder::new("d0")
        .status(DriveStatus::Ready)
        .build()]);
    let procfs = fixture.dir().join("proc");
    std::fs::create_dir_all(procfs.join("1")).unwrap();
    std::fs::write(
        procfs.join("1").join("mountinfo"),
        "36 25 8:16 / /var/lib/jbod/mnt/fs-d0 rw,noatime shared:1 - xfs /dev/jbod/fs-d0 rw,attr2\n",
    )
    .unwrap();

    let mounter = Arc::new(RecordingMounter::new());
    let reconciler = Reconciler::new(Arc::new(fixture.registry()), mounter.clone())
        .with_paths(paths())
        .with_mounts(MountTable::load(&procfs).unwrap());

    let report = reconciler
        .sync_drives(&[(scan(&["d0"]).remove(0), MismatchPolicy::NoOp)])
        .await;

    assert_eq!(report.updated, vec!["d0"]);
    assert!(report.mount_failures.is_empty());
    assert!(mounter.calls().is_empty());
}

#[tokio::test]
async fn unknown_drive_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    let good = FileRegistry::new(dir.path().join("drives.json"));
    good.insert(DriveBuilder::new("d0").build()).unwrap();
    good.insert(DriveBuilder::new("d2").build()).unwrap();

    let reconciler = Reconciler::new(Arc::new(good.clone()), Arc::new(RecordingMounter::new()));
    let mut drives: Vec<_> = scan(&["d0", "d1", "d2"])
        .into_iter()
        .map(|d| (d, MismatchPolicy::NoOp))
        .collect();
    drives[1].1 = MismatchPolicy::ForceUnidentified;

    let report = reconciler.sync_drives(&drives).await;

    assert_eq!(report.updated, vec!["d0", "d2"]);
    assert_eq!(report.skipped, vec!["d1"]);
    assert!(!report.has_errors());
    assert_eq!(good.list(&Default::default()).await.unwrap().len(), 2);
}
