//! Point-in-time snapshot of the node's active mounts
//!
//! Parses both the `/proc/<pid>/mountinfo` format and the simpler
//! `/proc/mounts` (fstab-like) format. Paths in either format escape
//! whitespace and backslashes as three-digit octal sequences (`\040`).

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// One active mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub source: PathBuf,
    pub target: PathBuf,
    pub fs_type: String,
    pub options: Vec<String>,
}

/// Read-only snapshot of active mounts, captured once per reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    entries: Vec<MountEntry>,
}

impl MountTable {
    pub fn from_entries(entries: Vec<MountEntry>) -> Self {
        Self { entries }
    }

    /// Load the mount table of the host init process through `procfs`.
    ///
    /// Reads `<procfs>/1/mountinfo`, falling back to `<procfs>/mounts`
    /// when mountinfo is not available. Lines that cannot be parsed are
    /// logged and skipped.
    pub fn load(procfs: &Path) -> Result<Self> {
        let mountinfo = procfs.join("1").join("mountinfo");
        let (path, parse): (PathBuf, LineParser) = if mountinfo.exists() {
            (mountinfo, parse_mountinfo_line as LineParser)
        } else {
            (procfs.join("mounts"), parse_mounts_line as LineParser)
        };
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Self::parse_with(&content, &path, parse))
    }

    /// Parse the `mountinfo` format:
    ///
    /// ```text
    /// 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
    /// ```
    pub fn parse_mountinfo(content: &str) -> Self {
        Self::parse_with(content, Path::new("mountinfo"), parse_mountinfo_line)
    }

    /// Parse the `/proc/mounts` format:
    ///
    /// ```text
    /// /dev/sda1 /boot ext4 rw,relatime 0 0
    /// ```
    pub fn parse_mounts(content: &str) -> Self {
        Self::parse_with(content, Path::new("mounts"), parse_mounts_line)
    }

    fn parse_with(content: &str, origin: &Path, parse: LineParser) -> Self {
        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse(line) {
                Ok(entry) => entries.push(entry),
                Err(reason) => tracing::warn!(
                    file = %origin.display(),
                    line = idx + 1,
                    reason,
                    "Skipping malformed mount table line"
                ),
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[MountEntry] {
        &self.entries
    }

    /// Whether some active mount uses `source` as its device.
    pub fn is_source_mounted(&self, source: &Path) -> bool {
        self.entries.iter().any(|m| m.source == source)
    }

    /// Active mounts of `source`, in table order.
    pub fn mounts_of<'a>(&'a self, source: &'a Path) -> impl Iterator<Item = &'a MountEntry> + 'a {
        self.entries.iter().filter(move |m| m.source == source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type LineParser = fn(&str) -> std::result::Result<MountEntry, &'static str>;

fn parse_mountinfo_line(line: &str) -> std::result::Result<MountEntry, &'static str> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let separator = fields
        .iter()
        .position(|f| *f == "-")
        .ok_or("missing optional-field separator")?;
    if separator < 6 || fields.len() < separator + 3 {
        return Err("too few fields");
    }
    Ok(MountEntry {
        source: PathBuf::from(unescape(fields[separator + 2])),
        target: PathBuf::from(unescape(fields[4])),
        fs_type: fields[separator + 1].to_string(),
        options: split_options(fields[5]),
    })
}

fn parse_mounts_line(line: &str) -> std::result::Result<MountEntry, &'static str> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err("too few fields");
    }
    Ok(MountEntry {
        source: PathBuf::from(unescape(fields[0])),
        target: PathBuf::from(unescape(fields[1])),
        fs_type: fields[2].to_string(),
        options: split_options(fields[3]),
    })
}

fn split_options(field: &str) -> Vec<String> {
    field
        .split(',')
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode `\ooo` octal escapes. Malformed sequences are kept verbatim.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
