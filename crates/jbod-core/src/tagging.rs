//! Bulk access-tier tagging

use jbod_model::{AccessTier, DriveRecord, DriveSelector};
use jbod_registry::{DriveRegistry, ListFilter};
use serde::Serialize;

use crate::{Error, Result};

/// A validated request to set the access tier on selected drives.
#[derive(Debug, Clone)]
pub struct TagRequest {
    pub tier: AccessTier,
    pub selector: DriveSelector,
    pub dry_run: bool,
}

impl TagRequest {
    /// Validate `tier` and `selector` before anything is read or written.
    ///
    /// The selector is checked first, so a request with neither selector
    /// nor valid tier reports the missing selector.
    pub fn new(tier: &str, selector: DriveSelector, dry_run: bool) -> Result<Self> {
        if selector.is_empty() {
            return Err(Error::MissingSelector);
        }
        let tier = tier.parse::<AccessTier>()?;
        Ok(Self {
            tier,
            selector,
            dry_run,
        })
    }
}

/// Outcome of [`set_access_tier`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagReport {
    /// Records as persisted or, in dry-run mode, as they would have been.
    pub tagged: Vec<DriveRecord>,
    /// Selected drives left alone because they are unavailable.
    pub skipped_unavailable: Vec<String>,
    pub dry_run: bool,
}

/// Set the access tier on every selected drive that can be tagged.
///
/// Stops at the first failed update; drives updated before it keep their
/// new tier.
pub async fn set_access_tier(registry: &dyn DriveRegistry, request: &TagRequest) -> Result<TagReport> {
    let drives = registry.list(&ListFilter::all()).await?;
    if drives.is_empty() {
        return Err(Error::NoDrivesFound);
    }

    let selected: Vec<DriveRecord> = drives
        .into_iter()
        .filter(|d| request.selector.matches(d))
        .collect();
    if selected.is_empty() {
        return Err(Error::NoMatchingDrives);
    }

    let mut report = TagReport {
        dry_run: request.dry_run,
        ..TagReport::default()
    };
    for mut drive in selected {
        if !drive.drive_status.policy().taggable {
            report.skipped_unavailable.push(drive.name);
            continue;
        }
        drive.access_tier = request.tier;
        let drive = if request.dry_run {
            drive
        } else {
            registry.update(&drive).await?
        };
        tracing::debug!(drive = %drive.name, tier = %request.tier, dry_run = request.dry_run, "Access tier set");
        report.tagged.push(drive);
    }

    tracing::info!(
        tagged = report.tagged.len(),
        skipped = report.skipped_unavailable.len(),
        tier = %request.tier,
        dry_run = request.dry_run,
        "Access tier tagging complete"
    );
    Ok(report)
}
