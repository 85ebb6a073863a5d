//! Glob-based drive selection for bulk operations

use glob::{MatchOptions, Pattern};

use crate::{DriveRecord, Error, Result};

const DEV_PREFIX: &str = "/dev/";

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Selects drive records by node name, device path and status.
///
/// Each non-empty pattern set must have at least one match; empty sets
/// match everything. `all` bypasses every pattern.
#[derive(Debug, Clone, Default)]
pub struct DriveSelector {
    nodes: Vec<Pattern>,
    drives: Vec<Pattern>,
    statuses: Vec<Pattern>,
    all: bool,
}

impl DriveSelector {
    /// Compile a selector.
    ///
    /// Drive patterns match the device path either in full (`/dev/nvme*`) or
    /// without its `/dev/` prefix (`nvme*`). Status patterns are prefix globs
    /// over the status name and ignore case, so `avail` selects `Available`.
    pub fn new(
        nodes: &[String],
        drives: &[String],
        statuses: &[String],
        all: bool,
    ) -> Result<Self> {
        let status_prefixes: Vec<String> = statuses.iter().map(|s| format!("{s}*")).collect();
        Ok(Self {
            nodes: compile(nodes.iter().map(String::as_str))?,
            drives: compile(drives.iter().map(String::as_str))?,
            statuses: compile(status_prefixes.iter().map(String::as_str))?,
            all,
        })
    }

    /// Selector matching every record.
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// True when neither `all` nor any pattern was given.
    pub fn is_empty(&self) -> bool {
        !self.all && self.nodes.is_empty() && self.drives.is_empty() && self.statuses.is_empty()
    }

    pub fn matches(&self, drive: &DriveRecord) -> bool {
        if self.all {
            return true;
        }

        let short_path = drive.path.strip_prefix(DEV_PREFIX).unwrap_or(&drive.path);
        any_match(&self.nodes, |p| p.matches(&drive.node_name))
            && any_match(&self.drives, |p| p.matches(&drive.path) || p.matches(short_path))
            && any_match(&self.statuses, |p| {
                p.matches_with(drive.drive_status.as_str(), CASE_INSENSITIVE)
            })
    }
}

fn compile<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<Vec<Pattern>> {
    patterns
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidPattern {
                pattern: p.to_string(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

fn any_match(patterns: &[Pattern], pred: impl Fn(&Pattern) -> bool) -> bool {
    patterns.is_empty() || patterns.iter().any(pred)
}
