//! [`DriveBuilder`] for drive record fixtures.

use jbod_model::{AccessTier, DriveRecord, DriveStatus};

/// Builds a [`DriveRecord`] on `node-1` at `/dev/sdb` unless told otherwise.
///
/// # Example
///
/// ```rust
/// use jbod_model::DriveStatus;
/// use jbod_test_utils::DriveBuilder;
///
/// let drive = DriveBuilder::new("d1")
///     .status(DriveStatus::InUse)
///     .capacity(1000, 400)
///     .build();
/// assert_eq!(drive.free_capacity, 600);
/// ```
#[derive(Debug, Clone)]
pub struct DriveBuilder {
    record: DriveRecord,
}

impl DriveBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            record: DriveRecord::new(name, "node-1", "/dev/sdb"),
        }
    }

    pub fn node(mut self, node_name: &str) -> Self {
        self.record.node_name = node_name.to_string();
        self
    }

    /// Set both the original and current device path.
    pub fn path(mut self, path: &str) -> Self {
        self.record.path = path.to_string();
        self.record.current_path = path.to_string();
        self
    }

    pub fn status(mut self, status: DriveStatus) -> Self {
        self.record.drive_status = status;
        self
    }

    pub fn tier(mut self, tier: AccessTier) -> Self {
        self.record.access_tier = tier;
        self
    }

    pub fn filesystem_uuid(mut self, uuid: &str) -> Self {
        self.record.filesystem_uuid = uuid.to_string();
        self
    }

    pub fn serial(mut self, serial: &str) -> Self {
        self.record.serial_number = serial.to_string();
        self
    }

    /// Populate every hardware identity field.
    pub fn identified(mut self, serial: &str, filesystem_uuid: &str) -> Self {
        self.record.serial_number = serial.to_string();
        self.record.filesystem_uuid = filesystem_uuid.to_string();
        self.record.partition_uuid = format!("part-{filesystem_uuid}");
        self.record.major_number = 8;
        self.record.minor_number = 16;
        self
    }

    /// Set total and allocated capacity; free capacity follows.
    pub fn capacity(mut self, total: i64, allocated: i64) -> Self {
        self.record.total_capacity = total;
        self.record.allocated_capacity = allocated;
        self.record.free_capacity = total - allocated;
        self
    }

    pub fn filesystem(mut self, filesystem: &str) -> Self {
        self.record.filesystem = filesystem.to_string();
        self
    }

    pub fn build(self) -> DriveRecord {
        self.record
    }
}
