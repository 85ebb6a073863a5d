//! `drives access-tier set`

use colored::Colorize;
use jbod_core::{TagRequest, set_access_tier};
use jbod_registry::DriveRegistry;

use crate::cli::SelectorArgs;
use crate::error::Result;

/// Tag the selected drives, or print the would-be records as YAML when
/// `dry_run` is set.
pub async fn run_access_tier_set(
    registry: &dyn DriveRegistry,
    tier: &str,
    selectors: &SelectorArgs,
    dry_run: bool,
) -> Result<()> {
    let request = TagRequest::new(tier, selectors.to_selector()?, dry_run)?;
    let report = set_access_tier(registry, &request).await?;

    if report.dry_run {
        for drive in &report.tagged {
            print!("---\n{}", serde_yaml::to_string(drive)?);
        }
        return Ok(());
    }

    for drive in &report.tagged {
        println!(
            "{} {} ({} on {})",
            "tagged".green(),
            drive.name,
            drive.path,
            drive.node_name
        );
    }
    for name in &report.skipped_unavailable {
        println!("{} {} (unavailable)", "skipped".yellow(), name);
    }
    println!(
        "{} {} drive(s) set to access-tier {}",
        "Done:".bold(),
        report.tagged.len(),
        request.tier.to_string().cyan()
    );

    Ok(())
}
