//! Drive record naming
//!
//! Records created before drives were identified by hardware attributes were
//! named from the node name and device path. That scheme is still needed to
//! recognise records that have not completed the identity upgrade.

use uuid::Uuid;

/// Name a record would have received under the node+path scheme.
pub fn legacy_drive_name(node_name: &str, path: &str) -> String {
    let key = format!("{node_name}-{path}");
    Uuid::new_v5(&Uuid::NAMESPACE_X500, key.as_bytes()).to_string()
}
