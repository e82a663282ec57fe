// src/config/resolve.rs

//! Per-field defaulting.
//!
//! Every field is resolved on its own, trying in order:
//!
//! 1. the entry itself,
//! 2. the document's `defaults` block,
//! 3. the document's top level,
//! 4. the built-in constant.
//!
//! The first tier where the field is *present* wins. `null` counts as absent;
//! `false` and `0` do not. For boolean and integer fields an empty string is
//! also treated as absent.

use serde_yaml::Value;
use tracing::{debug, info};

use crate::config::model::{ConfigDocument, Field, FieldSet, PATHS_KEY};
use crate::config::validate::{describe, validate_job};
use crate::errors::{BackupGenError, Result};
use crate::naming::validate_key;
use crate::types::{EntryKind, PathMode};

/// Built-in fallbacks, used when no tier sets a field.
pub mod builtin {
    use crate::types::PathMode;

    pub const COMPRESSION_LVL: u64 = 3;
    pub const RETENTION_DAYS: u64 = 14;
    pub const ON_CALENDAR: &str = "*-*-* 11:30:00";
    pub const RANDOMIZED_DELAY: &str = "15m";
    pub const PERSISTENT: bool = true;
    pub const OWNER: &str = "";
    pub const STOP_WAIT_SECONDS: u64 = 300;
    pub const RESTART_AFTER_BACKUP: bool = true;
    pub const PATH_MODE: PathMode = PathMode::Target;
}

/// Fully resolved settings of one backup job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupJob {
    pub key: String,
    pub kind: EntryKind,
    pub dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub output_dir: String,
    pub compression_lvl: u64,
    pub retention_days: u64,
    pub on_calendar: String,
    pub randomized_delay: String,
    pub persistent: bool,
    pub owner: String,
    pub stop_wait_seconds: u64,
    pub restart_after_backup: bool,
    pub path_mode: PathMode,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Entry,
    Defaults,
    Global,
    Builtin,
}

/// Resolves entry fields against one document.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    doc: &'a ConfigDocument,
}

impl<'a> Resolver<'a> {
    pub fn new(doc: &'a ConfigDocument) -> Self {
        Self { doc }
    }

    /// First tier that sets `field`, with its raw value.
    pub fn lookup<'e>(&self, entry: &'e FieldSet, field: Field) -> Option<(Tier, &'e Value)>
    where
        'a: 'e,
    {
        self.lookup_where(entry, field, |_| true)
    }

    fn lookup_where<'e>(
        &self,
        entry: &'e FieldSet,
        field: Field,
        present: impl Fn(&Value) -> bool,
    ) -> Option<(Tier, &'e Value)>
    where
        'a: 'e,
    {
        let doc: &'e ConfigDocument = self.doc;
        [
            (Tier::Entry, entry),
            (Tier::Defaults, &doc.defaults),
            (Tier::Global, &doc.global),
        ]
        .into_iter()
        .find_map(|(tier, set)| {
            set.get(field.name())
                .filter(|v| present(*v))
                .map(|v| (tier, v))
        })
    }

    /// Boolean field with truthy normalisation: `1`, `true`, `yes`, `on`
    /// (any case) are true, every other non-empty value is false.
    pub fn resolve_bool(&self, key: &str, entry: &FieldSet, field: Field, fallback: bool) -> Result<bool> {
        match self.lookup_where(entry, field, not_blank) {
            Some((tier, value)) => {
                let parsed = truthy(value).ok_or_else(|| type_error(key, field, "a boolean", value))?;
                trace_tier(key, field, tier);
                Ok(parsed)
            }
            None => {
                trace_tier(key, field, Tier::Builtin);
                Ok(fallback)
            }
        }
    }

    /// Non-negative integer field; numeric strings are accepted.
    pub fn resolve_u64(&self, key: &str, entry: &FieldSet, field: Field, fallback: u64) -> Result<u64> {
        match self.lookup_where(entry, field, not_blank) {
            Some((tier, value)) => {
                let parsed = match value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| type_error(key, field, "a non-negative integer", value))?;
                trace_tier(key, field, tier);
                Ok(parsed)
            }
            None => {
                trace_tier(key, field, Tier::Builtin);
                Ok(fallback)
            }
        }
    }

    /// String field. Numbers are accepted and rendered as written.
    pub fn resolve_string(&self, key: &str, entry: &FieldSet, field: Field) -> Result<Option<String>> {
        match self.lookup(entry, field) {
            Some((tier, value)) => {
                let parsed = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return Err(type_error(key, field, "a string", value)),
                };
                trace_tier(key, field, tier);
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Ordered list field. A single string counts as a one-element list; an
    /// explicit empty list is present and wins.
    pub fn resolve_list(&self, key: &str, entry: &FieldSet, field: Field) -> Result<Option<Vec<String>>> {
        match self.lookup(entry, field) {
            Some((tier, value)) => {
                let parsed = match value {
                    Value::String(s) => vec![s.clone()],
                    Value::Sequence(items) => items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => Ok(s.clone()),
                            Value::Number(n) => Ok(n.to_string()),
                            other => Err(type_error(key, field, "a list of strings", other)),
                        })
                        .collect::<Result<Vec<_>>>()?,
                    _ => return Err(type_error(key, field, "a list of strings", value)),
                };
                trace_tier(key, field, tier);
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Resolve every field of one entry into a [`BackupJob`].
    ///
    /// The key itself must already have passed [`validate_key`].
    pub fn resolve_entry(&self, key: &str, kind: EntryKind, entry: &FieldSet) -> Result<BackupJob> {
        let dirs = self
            .resolve_list(key, entry, Field::Dirs)?
            .ok_or_else(|| BackupGenError::validation(key, "`dirs` is required"))?;

        let exclude_patterns = self
            .resolve_list(key, entry, Field::ExcludePatterns)?
            .unwrap_or_default();

        let output_dir = self
            .resolve_string(key, entry, Field::OutputDir)?
            .ok_or_else(|| BackupGenError::validation(key, "`output_dir` is required"))?;

        let path_mode = match self.resolve_string(key, entry, Field::PathMode)? {
            Some(raw) => raw
                .parse::<PathMode>()
                .map_err(|msg| BackupGenError::validation(key, msg))?,
            None => builtin::PATH_MODE,
        };

        let restart_after_backup = match kind {
            EntryKind::Service => self.resolve_bool(
                key,
                entry,
                Field::RestartAfterBackup,
                builtin::RESTART_AFTER_BACKUP,
            )?,
            // There is no service to restart for bare paths.
            EntryKind::Paths => false,
        };

        Ok(BackupJob {
            key: key.to_string(),
            kind,
            dirs,
            exclude_patterns,
            output_dir,
            compression_lvl: self.resolve_u64(key, entry, Field::CompressionLvl, builtin::COMPRESSION_LVL)?,
            retention_days: self.resolve_u64(key, entry, Field::RetentionDays, builtin::RETENTION_DAYS)?,
            on_calendar: self
                .resolve_string(key, entry, Field::OnCalendar)?
                .unwrap_or_else(|| builtin::ON_CALENDAR.to_string()),
            randomized_delay: self
                .resolve_string(key, entry, Field::RandomizedDelay)?
                .unwrap_or_else(|| builtin::RANDOMIZED_DELAY.to_string()),
            persistent: self.resolve_bool(key, entry, Field::Persistent, builtin::PERSISTENT)?,
            owner: self
                .resolve_string(key, entry, Field::Owner)?
                .unwrap_or_else(|| builtin::OWNER.to_string()),
            stop_wait_seconds: self.resolve_u64(
                key,
                entry,
                Field::StopWaitSeconds,
                builtin::STOP_WAIT_SECONDS,
            )?,
            restart_after_backup,
            path_mode,
        })
    }
}

/// Resolve and validate every entry of `doc`.
///
/// Service entries come first (in map order, which carries no meaning),
/// the `paths` block last. The first hard error aborts.
pub fn resolve_all(doc: &ConfigDocument) -> Result<Vec<BackupJob>> {
    let resolver = Resolver::new(doc);
    let paths = doc.paths.as_ref().filter(|p| p.is_usable());

    if paths.is_some() && doc.services.contains_key(PATHS_KEY) {
        return Err(BackupGenError::validation(
            PATHS_KEY,
            "service key collides with the `paths` block; rename the service or drop the block",
        ));
    }

    let mut jobs = Vec::with_capacity(doc.services.len() + 1);

    for (key, entry) in &doc.services {
        validate_key(key)?;
        let job = resolver.resolve_entry(key, EntryKind::Service, entry)?;
        validate_job(&job)?;
        jobs.push(job);
    }

    match (&doc.paths, paths) {
        (_, Some(section)) => {
            let job = resolver.resolve_entry(PATHS_KEY, EntryKind::Paths, &section.fields())?;
            validate_job(&job)?;
            jobs.push(job);
        }
        (Some(_), None) => info!("`paths` list is empty; no path backup generated"),
        (None, None) => {}
    }

    Ok(jobs)
}

fn not_blank(value: &Value) -> bool {
    !matches!(value, Value::String(s) if s.trim().is_empty())
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_i64() == Some(1)),
        Value::String(s) => Some(matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )),
        _ => None,
    }
}

fn type_error(key: &str, field: Field, expected: &str, value: &Value) -> BackupGenError {
    BackupGenError::validation(
        key,
        format!("`{}` must be {expected} (got {})", field.name(), describe(value)),
    )
}

fn trace_tier(key: &str, field: Field, tier: Tier) {
    debug!(entry = %key, field = field.name(), ?tier, "resolved field");
}
