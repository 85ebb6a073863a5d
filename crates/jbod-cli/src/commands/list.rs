//! `drives list`

use colored::Colorize;
use jbod_registry::{DriveRegistry, ListFilter};

use super::{colored_status, format_bytes};
use crate::cli::SelectorArgs;
use crate::error::Result;

/// Print the drive records matching `selectors`.
pub async fn run_list(registry: &dyn DriveRegistry, selectors: &SelectorArgs, json: bool) -> Result<()> {
    let selector = selectors.to_selector()?;
    let drives: Vec<_> = registry
        .list(&ListFilter::all())
        .await?
        .into_iter()
        .filter(|d| selector.matches(d))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&drives)?);
        return Ok(());
    }

    if drives.is_empty() {
        println!("{}", "No drives found".dimmed());
        return Ok(());
    }

    println!(
        "{:<38} {:<16} {:<16} {:<14} {:<8} {:>11} {:>11}",
        "NAME".bold(),
        "NODE".bold(),
        "PATH".bold(),
        "STATUS".bold(),
        "TIER".bold(),
        "CAPACITY".bold(),
        "FREE".bold()
    );
    for drive in &drives {
        println!(
            "{:<38} {:<16} {:<16} {:<14} {:<8} {:>11} {:>11}",
            drive.name,
            drive.node_name,
            drive.path,
            colored_status(drive.drive_status),
            drive.access_tier.as_str(),
            format_bytes(drive.total_capacity),
            format_bytes(drive.free_capacity)
        );
    }
    println!();
    println!("{} {} drive(s)", "Total:".dimmed(), drives.len());

    Ok(())
}
