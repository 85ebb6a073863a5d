//! Merge of a locally observed drive into its cluster record
//!
//! The node that can see a device is the ground truth for its hardware,
//! filesystem and total capacity; the cluster record is the ground truth
//! for anything the attach path owns. [`merge`] applies that split.

use jbod_model::{DriveRecord, DriveStatus};

/// Status override applied before the generic merge, for records that may
/// no longer correspond to the drive the node observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// The local drive cleanly matches the record; no override.
    #[default]
    NoOp,
    /// Mark the record unidentified unless it is a legacy-named record still
    /// waiting for its hardware identifiers.
    LegacyMigration,
    /// Always mark the record unidentified.
    ForceUnidentified,
}

impl MismatchPolicy {
    /// Apply the override to `existing`.
    ///
    /// Note that `LegacyMigration` marks any already-upgraded record as
    /// unidentified, even when `local` describes the very same drive.
    pub fn apply(self, existing: &mut DriveRecord, local: &DriveRecord) {
        match self {
            MismatchPolicy::NoOp => {}
            MismatchPolicy::LegacyMigration => {
                if !existing.is_pending_identity_upgrade() {
                    mark_unidentified(existing, local);
                }
            }
            MismatchPolicy::ForceUnidentified => mark_unidentified(existing, local),
        }
    }
}

fn mark_unidentified(existing: &mut DriveRecord, local: &DriveRecord) {
    existing.drive_status = DriveStatus::Unidentified;
    existing.conditions = local.conditions.clone();
}

/// Merge `local` into `existing` and return the record to persist.
///
/// Capacity is re-derived on every merge: allocation comes from the cluster
/// record when the (possibly overridden) status preserves it, otherwise
/// from `local`, and `free = local.total - allocated`. A shrunken drive may
/// yield negative free capacity; that is reported, not rejected.
pub fn merge(mut existing: DriveRecord, local: &DriveRecord, policy: MismatchPolicy) -> DriveRecord {
    policy.apply(&mut existing, local);

    existing.root_partition = local.root_partition.clone();
    existing.partition_number = local.partition_number;
    existing.filesystem = local.filesystem.clone();
    existing.mountpoint = local.mountpoint.clone();
    existing.mount_options = local.mount_options.clone();
    existing.model_number = local.model_number.clone();
    existing.physical_block_size = local.physical_block_size;
    existing.logical_block_size = local.logical_block_size;
    existing.current_path = local.current_path.clone();
    existing.total_capacity = local.total_capacity;

    // Known-good identity is never blanked by an unconfirmed observation
    keep_populated(&mut existing.filesystem_uuid, &local.filesystem_uuid);
    keep_populated(&mut existing.serial_number, &local.serial_number);
    keep_populated(&mut existing.partition_uuid, &local.partition_uuid);
    if local.major_number != 0 {
        existing.major_number = local.major_number;
    }
    if local.minor_number != 0 {
        existing.minor_number = local.minor_number;
    }

    let allocated = if existing.drive_status.policy().preserve_allocated {
        existing.allocated_capacity
    } else {
        local.allocated_capacity
    };
    existing.allocated_capacity = allocated;
    existing.free_capacity = local.total_capacity.saturating_sub(allocated);

    existing
}

fn keep_populated(target: &mut String, observed: &str) {
    if !observed.is_empty() {
        *target = observed.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jbod_model::{
        AccessTier, Condition, ConditionReason, ConditionType, Conditions, legacy_drive_name,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cluster_record() -> DriveRecord {
        let mut d = DriveRecord::new("drive-1", "node-1", "/dev/sdb");
        d.resource_version = "7".to_string();
        d.serial_number = "S3EVNX0K".to_string();
        d.filesystem_uuid = "6f1c2a".to_string();
        d.partition_uuid = "p-1".to_string();
        d.major_number = 8;
        d.minor_number = 16;
        d.total_capacity = 1000;
        d.allocated_capacity = 400;
        d.free_capacity = 600;
        d.drive_status = DriveStatus::InUse;
        d.access_tier = AccessTier::Hot;
        d
    }

    fn local_observation() -> DriveRecord {
        let mut d = DriveRecord::new("drive-1", "node-1", "/dev/sdb");
        d.current_path = "/dev/sdc".to_string();
        d.serial_number = "S3EVNX0K".to_string();
        d.filesystem_uuid = "6f1c2a".to_string();
        d.partition_uuid = "p-1".to_string();
        d.major_number = 8;
        d.minor_number = 32;
        d.model_number = "SAMSUNG MZ7LH".to_string();
        d.filesystem = "xfs".to_string();
        d.mountpoint = "/var/lib/jbod/mnt/6f1c2a".to_string();
        d.mount_options = vec!["rw".to_string(), "noatime".to_string()];
        d.physical_block_size = 4096;
        d.logical_block_size = 512;
        d.root_partition = "sdc".to_string();
        d.partition_number = 1;
        d.total_capacity = 2000;
        d.allocated_capacity = 0;
        d
    }

    #[test]
    fn local_authoritative_fields_are_copied() {
        let merged = merge(cluster_record(), &local_observation(), MismatchPolicy::NoOp);
        let local = local_observation();

        assert_eq!(merged.current_path, local.current_path);
        assert_eq!(merged.minor_number, 32);
        assert_eq!(merged.model_number, local.model_number);
        assert_eq!(merged.filesystem, "xfs");
        assert_eq!(merged.mountpoint, local.mountpoint);
        assert_eq!(merged.mount_options, local.mount_options);
        assert_eq!(merged.physical_block_size, 4096);
        assert_eq!(merged.logical_block_size, 512);
        assert_eq!(merged.root_partition, "sdc");
        assert_eq!(merged.partition_number, 1);
        assert_eq!(merged.total_capacity, 2000);
    }

    #[test]
    fn cluster_owned_fields_are_kept() {
        let merged = merge(cluster_record(), &local_observation(), MismatchPolicy::NoOp);

        assert_eq!(merged.name, "drive-1");
        assert_eq!(merged.resource_version, "7");
        assert_eq!(merged.node_name, "node-1");
        assert_eq!(merged.path, "/dev/sdb");
        assert_eq!(merged.access_tier, AccessTier::Hot);
        assert_eq!(merged.drive_status, DriveStatus::InUse);
    }

    #[test]
    fn in_use_preserves_allocation() {
        let merged = merge(cluster_record(), &local_observation(), MismatchPolicy::NoOp);
        assert_eq!(merged.allocated_capacity, 400);
        assert_eq!(merged.free_capacity, 1600);
    }

    #[rstest]
    #[case(DriveStatus::Available)]
    #[case(DriveStatus::Ready)]
    #[case(DriveStatus::Unavailable)]
    #[case(DriveStatus::Unidentified)]
    fn other_statuses_take_local_allocation(#[case] status: DriveStatus) {
        let mut existing = cluster_record();
        existing.drive_status = status;
        let mut local = local_observation();
        local.allocated_capacity = 250;

        let merged = merge(existing, &local, MismatchPolicy::NoOp);
        assert_eq!(merged.allocated_capacity, 250);
        assert_eq!(merged.free_capacity, 1750);
    }

    #[test]
    fn shrunken_drive_yields_negative_free_capacity() {
        let mut local = local_observation();
        local.total_capacity = 100;

        let merged = merge(cluster_record(), &local, MismatchPolicy::NoOp);
        assert_eq!(merged.allocated_capacity, 400);
        assert_eq!(merged.free_capacity, -300);
    }

    #[test]
    fn empty_local_identity_does_not_blank_cluster_identity() {
        let mut local = local_observation();
        local.serial_number.clear();
        local.filesystem_uuid.clear();
        local.partition_uuid.clear();
        local.major_number = 0;
        local.minor_number = 0;

        let merged = merge(cluster_record(), &local, MismatchPolicy::NoOp);
        assert_eq!(merged.serial_number, "S3EVNX0K");
        assert_eq!(merged.filesystem_uuid, "6f1c2a");
        assert_eq!(merged.partition_uuid, "p-1");
        assert_eq!(merged.major_number, 8);
        assert_eq!(merged.minor_number, 16);
    }

    #[test]
    fn populated_local_identity_replaces_cluster_identity() {
        let mut local = local_observation();
        local.filesystem_uuid = "reformatted".to_string();

        let merged = merge(cluster_record(), &local, MismatchPolicy::NoOp);
        assert_eq!(merged.filesystem_uuid, "reformatted");
    }

    #[test]
    fn force_unidentified_overrides_status_and_conditions() {
        let mut local = local_observation();
        local.conditions = Conditions::from(vec![Condition::new(
            ConditionType::Owned,
            false,
            ConditionReason::Added,
            "",
        )]);

        let merged = merge(cluster_record(), &local, MismatchPolicy::ForceUnidentified);
        assert_eq!(merged.drive_status, DriveStatus::Unidentified);
        assert_eq!(merged.conditions, local.conditions);
        // Override runs first, so the status no longer preserves allocation
        assert_eq!(merged.allocated_capacity, 0);
        assert_eq!(merged.free_capacity, 2000);
    }

    #[test]
    fn legacy_policy_leaves_pending_upgrade_alone() {
        let name = legacy_drive_name("node-1", "/dev/sdb");
        let mut existing = DriveRecord::new(name, "node-1", "/dev/sdb");
        existing.drive_status = DriveStatus::Available;
        existing.conditions.set(
            ConditionType::Formatted,
            true,
            ConditionReason::Added,
            "",
        );
        let conditions_before = existing.conditions.clone();

        let merged = merge(existing, &local_observation(), MismatchPolicy::LegacyMigration);
        assert_eq!(merged.drive_status, DriveStatus::Available);
        assert_eq!(merged.conditions, conditions_before);
    }

    #[test]
    fn legacy_policy_marks_upgraded_record_unidentified() {
        let name = legacy_drive_name("node-1", "/dev/sdb");
        let mut existing = DriveRecord::new(name, "node-1", "/dev/sdb");
        existing.drive_status = DriveStatus::Available;
        existing.serial_number = "S3EVNX0K".to_string();

        let merged = merge(existing, &local_observation(), MismatchPolicy::LegacyMigration);
        assert_eq!(merged.drive_status, DriveStatus::Unidentified);
    }

    #[test]
    fn legacy_policy_marks_non_legacy_name_unidentified() {
        let mut existing = DriveRecord::new("hardware-derived", "node-1", "/dev/sdb");
        existing.drive_status = DriveStatus::Ready;

        let merged = merge(existing, &local_observation(), MismatchPolicy::LegacyMigration);
        assert_eq!(merged.drive_status, DriveStatus::Unidentified);
    }

    #[test]
    fn second_merge_is_identical() {
        let local = local_observation();
        let once = merge(cluster_record(), &local, MismatchPolicy::LegacyMigration);
        let twice = merge(once.clone(), &local, MismatchPolicy::LegacyMigration);
        assert_eq!(once, twice);
    }
}
