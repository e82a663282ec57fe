// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// How the backup runner lays out `BACKUP_DIRS` inside the archive.
///
/// - `Target`: store each directory under its own base name (default).
/// - `Preserve`: keep the full absolute path.
/// - `Contents`: store the directory contents without the directory itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    #[default]
    Target,
    Preserve,
    Contents,
}

impl PathMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PathMode::Target => "target",
            PathMode::Preserve => "preserve",
            PathMode::Contents => "contents",
        }
    }
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "target" => Ok(PathMode::Target),
            "preserve" => Ok(PathMode::Preserve),
            "contents" => Ok(PathMode::Contents),
            other => Err(format!(
                "invalid path_mode: {other} (expected \"target\", \"preserve\" or \"contents\")"
            )),
        }
    }
}

/// Which naming scheme the generator uses for backup jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GenerationMode {
    /// One `backup-<key>.service` + `.timer` pair per entry.
    #[default]
    Standalone,
    /// One `backup@<escaped-key>.timer` per entry, bound to a pre-installed
    /// `backup@.service` template.
    Template,
}

/// Whether an entry comes from `services` or from the `paths` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Service,
    Paths,
}

/// Outcome of a unit existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Found,
    NotFound,
}
