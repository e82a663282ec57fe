// src/naming/mod.rs

//! Derived names and paths for a backup job.
//!
//! Given a raw entry key this module produces the supervised service unit,
//! the backup job name (`backup-<key>` or `backup@<escaped-key>`), and the
//! on-disk locations of the generated fragment and unit files.

pub mod escape;

use std::path::{Path, PathBuf};

use crate::errors::{BackupGenError, Result};
use crate::types::{EntryKind, GenerationMode};

pub use escape::{escape_instance, unescape_instance};

/// Suffix of supervised service units.
pub const SERVICE_SUFFIX: &str = ".service";
/// Suffix of scheduled-job units.
pub const TIMER_SUFFIX: &str = ".timer";
/// Suffix of execution-config fragments.
pub const FRAGMENT_SUFFIX: &str = ".conf";
/// Common stem of every generated job.
pub const JOB_STEM: &str = "backup";

/// Reject keys that cannot be mapped to a unit safely.
///
/// Runs before anything else looks at the key, including the existence
/// check and escaping.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(BackupGenError::validation(key, "service key must not be empty"));
    }
    if key.contains('/') {
        return Err(BackupGenError::validation(key, "service key must not contain '/'"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(BackupGenError::validation(key, "service key must not contain whitespace"));
    }
    if key.ends_with(SERVICE_SUFFIX) {
        return Err(BackupGenError::validation(
            key,
            format!("service key must not end in '{SERVICE_SUFFIX}'; it is appended automatically"),
        ));
    }
    if key.ends_with('@') {
        return Err(BackupGenError::validation(
            key,
            "service key names a template without an instance",
        ));
    }
    Ok(())
}

/// `web` -> `web.service`.
pub fn service_unit(key: &str) -> String {
    format!("{key}{SERVICE_SUFFIX}")
}

/// For an instance key `name@inst`, the template unit `name@.service`.
pub fn template_unit(key: &str) -> Option<String> {
    key.split_once('@')
        .map(|(name, _)| format!("{name}@{SERVICE_SUFFIX}"))
}

/// Every name and path derived from one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobNames {
    /// Supervised unit stopped around the backup; `None` for the paths block.
    pub service_unit: Option<String>,
    /// `backup-web` or `backup@web`.
    pub job_name: String,
    /// Unit performing the backup (`<job_name>.service`).
    pub job_unit: String,
    /// Scheduled-job unit (`<job_name>.timer`).
    pub timer_unit: String,
    pub fragment_path: PathBuf,
    pub timer_path: PathBuf,
    /// Rendered job unit; template mode relies on an installed template.
    pub job_unit_path: Option<PathBuf>,
}

impl JobNames {
    pub fn derive(
        key: &str,
        kind: EntryKind,
        mode: GenerationMode,
        unit_dir: &Path,
        config_dir: &Path,
    ) -> Self {
        let component = match mode {
            GenerationMode::Standalone => key.to_string(),
            GenerationMode::Template => escape_instance(key),
        };
        let job_name = match mode {
            GenerationMode::Standalone => format!("{JOB_STEM}-{component}"),
            GenerationMode::Template => format!("{JOB_STEM}@{component}"),
        };
        let job_unit = format!("{job_name}{SERVICE_SUFFIX}");
        let timer_unit = format!("{job_name}{TIMER_SUFFIX}");

        Self {
            service_unit: match kind {
                EntryKind::Service => Some(service_unit(key)),
                EntryKind::Paths => None,
            },
            fragment_path: config_dir.join(format!("{component}{FRAGMENT_SUFFIX}")),
            timer_path: unit_dir.join(&timer_unit),
            job_unit_path: match mode {
                GenerationMode::Standalone => Some(unit_dir.join(&job_unit)),
                GenerationMode::Template => None,
            },
            job_name,
            job_unit,
            timer_unit,
        }
    }
}
