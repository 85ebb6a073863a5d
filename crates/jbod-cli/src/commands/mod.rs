//! Command implementations for jbod-cli

pub mod list;
pub mod sync;
pub mod tag;

pub use list::run_list;
pub use sync::{SyncOptions, run_sync};
pub use tag::run_access_tier_set;

use colored::{ColoredString, Colorize};
use jbod_model::DriveStatus;

/// Status name coloured by how usable the drive is.
pub(crate) fn colored_status(status: DriveStatus) -> ColoredString {
    let name = status.to_string();
    match status {
        DriveStatus::Available => name.green(),
        DriveStatus::InUse | DriveStatus::Ready => name.cyan(),
        DriveStatus::Unavailable => name.red(),
        DriveStatus::Unidentified => name.yellow(),
    }
}

/// Render a byte count with a binary unit suffix.
pub(crate) fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    let sign = if bytes < 0 { "-" } else { "" };
    let mut value = bytes.unsigned_abs() as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{sign}{value} {}", UNITS[unit])
    } else {
        format!("{sign}{value:.1} {}", UNITS[unit])
    }
}
