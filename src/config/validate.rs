// src/config/validate.rs

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use globset::Glob;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::config::model::{ConfigDocument, Field, FieldSet, PathsSection, RawConfigDocument, PATHS_KEY};
use crate::config::resolve::BackupJob;
use crate::errors::{BackupGenError, Result};

/// A systemd time span: one or more `<number>[unit]` groups.
static TIMESPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+(\.\d+)?\s*(usec|us|msec|ms|seconds|second|sec|s|minutes|minute|min|m|hours|hour|hr|h|days|day|d|weeks|week|w|months|month|M|years|year|y)?\s*)+$",
    )
    .expect("timespan regex is valid")
});

impl TryFrom<RawConfigDocument> for ConfigDocument {
    type Error = BackupGenError;

    fn try_from(raw: RawConfigDocument) -> std::result::Result<Self, Self::Error> {
        let defaults = match raw.defaults {
            None => FieldSet::default(),
            Some(Value::Mapping(map)) => field_set("defaults", map)?,
            Some(_) => {
                return Err(BackupGenError::SchemaError(
                    "`defaults` must be a mapping".to_string(),
                ));
            }
        };
        warn_unknown_fields("defaults", &defaults);

        let services = match raw.services {
            None => BTreeMap::new(),
            Some(Value::Mapping(map)) => services_from_mapping(map)?,
            Some(_) => {
                return Err(BackupGenError::SchemaError(
                    "`services` must be a mapping of service name to settings".to_string(),
                ));
            }
        };

        let paths = match raw.paths {
            None => None,
            Some(Value::Sequence(items)) => Some(PathsSection::List(path_list(items)?)),
            Some(Value::Mapping(map)) => {
                let set = field_set(PATHS_KEY, map)?;
                warn_unknown_fields(PATHS_KEY, &set);
                Some(PathsSection::Block(set))
            }
            Some(_) => {
                return Err(BackupGenError::SchemaError(
                    "`paths` must be a list of directories or a mapping".to_string(),
                ));
            }
        };

        Ok(ConfigDocument {
            global: FieldSet::new(raw.global),
            defaults,
            services,
            paths,
        })
    }
}

fn services_from_mapping(map: Mapping) -> Result<BTreeMap<String, FieldSet>> {
    let mut services = BTreeMap::new();
    for (key, value) in map {
        let name = match key {
            Value::String(s) => s,
            other => {
                return Err(BackupGenError::SchemaError(format!(
                    "service names must be strings (got {})",
                    describe(&other)
                )));
            }
        };
        let set = match value {
            Value::Null => FieldSet::default(),
            Value::Mapping(fields) => field_set(&name, fields)?,
            other => {
                return Err(BackupGenError::SchemaError(format!(
                    "service '{name}' must be a mapping of settings (got {})",
                    describe(&other)
                )));
            }
        };
        warn_unknown_fields(&name, &set);
        services.insert(name, set);
    }
    Ok(services)
}

fn field_set(context: &str, map: Mapping) -> Result<FieldSet> {
    let mut fields = BTreeMap::new();
    for (key, value) in map {
        match key {
            Value::String(s) => {
                fields.insert(s, value);
            }
            other => {
                return Err(BackupGenError::SchemaError(format!(
                    "field names in '{context}' must be strings (got {})",
                    describe(&other)
                )));
            }
        }
    }
    Ok(FieldSet::new(fields))
}

fn path_list(items: Vec<Value>) -> Result<Vec<String>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(BackupGenError::SchemaError(format!(
                "`paths` entries must be strings (got {})",
                describe(&other)
            ))),
        })
        .collect()
}

fn warn_unknown_fields(context: &str, set: &FieldSet) {
    for name in set.names() {
        if Field::from_name(name).is_none() {
            warn!(entry = %context, field = %name, "ignoring unknown field");
        }
    }
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Check the resolved values of a single job.
///
/// Anything returned here is a hard configuration error.
pub fn validate_job(job: &BackupJob) -> Result<()> {
    let key = job.key.as_str();

    if job.dirs.is_empty() {
        return Err(BackupGenError::validation(
            key,
            "`dirs` must list at least one directory",
        ));
    }
    for dir in &job.dirs {
        ensure_absolute(key, Field::Dirs, dir)?;
    }

    ensure_absolute(key, Field::OutputDir, &job.output_dir)?;

    for pattern in &job.exclude_patterns {
        ensure_single_line(key, Field::ExcludePatterns, pattern)?;
        Glob::new(pattern).map_err(|e| {
            BackupGenError::validation(key, format!("invalid exclude pattern '{pattern}': {e}"))
        })?;
    }

    if job.on_calendar.trim().is_empty() {
        return Err(BackupGenError::validation(key, "`on_calendar` must not be empty"));
    }
    ensure_single_line(key, Field::OnCalendar, &job.on_calendar)?;

    if !TIMESPAN.is_match(job.randomized_delay.trim()) {
        return Err(BackupGenError::validation(
            key,
            format!(
                "`randomized_delay` is not a time span: '{}' (expected e.g. \"15m\" or \"1h 30min\")",
                job.randomized_delay
            ),
        ));
    }

    ensure_single_line(key, Field::Owner, &job.owner)?;

    Ok(())
}

fn ensure_absolute(key: &str, field: Field, value: &str) -> Result<()> {
    ensure_single_line(key, field, value)?;
    if !Path::new(value).is_absolute() {
        return Err(BackupGenError::validation(
            key,
            format!("`{}` must be an absolute path (got '{value}')", field.name()),
        ));
    }
    Ok(())
}

fn ensure_single_line(key: &str, field: Field, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(BackupGenError::validation(
            key,
            format!("`{}` must not contain line breaks", field.name()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryKind, PathMode};

    fn job() -> BackupJob {
        BackupJob {
            key: "web".to_string(),
            kind: EntryKind::Service,
            dirs: vec!["/srv/www".to_string()],
            exclude_patterns: vec!["*.tmp".to_string()],
            output_dir: "/backup/web".to_string(),
            compression_lvl: 3,
            retention_days: 14,
            on_calendar: "*-*-* 11:30:00".to_string(),
            randomized_delay: "15m".to_string(),
            persistent: true,
            owner: String::new(),
            stop_wait_seconds: 300,
            restart_after_backup: true,
            path_mode: PathMode::Target,
        }
    }

    #[test]
    fn accepts_a_sane_job() {
        validate_job(&job()).unwrap();
    }

    #[test]
    fn relative_dirs_are_rejected() {
        let mut j = job();
        j.dirs.push("srv/data".to_string());
        let err = validate_job(&j).unwrap_err();
        assert!(err.to_string().contains("absolute"), "{err}");
    }

    #[test]
    fn relative_output_dir_is_rejected() {
        let mut j = job();
        j.output_dir = "backup".to_string();
        assert!(validate_job(&j).is_err());
    }

    #[test]
    fn timespans_follow_service_manager_syntax() {
        for ok in ["15m", "90", "1h 30min", "2 days", "500ms", "0"] {
            let mut j = job();
            j.randomized_delay = ok.to_string();
            assert!(validate_job(&j).is_ok(), "{ok} should be accepted");
        }
        for bad in ["soon", "", "15 parsecs", "-5m"] {
            let mut j = job();
            j.randomized_delay = bad.to_string();
            assert!(validate_job(&j).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn multi_line_values_cannot_reach_unit_files() {
        let mut j = job();
        j.on_calendar = "daily\nExecStartPre=/bin/true".to_string();
        assert!(validate_job(&j).is_err());
    }

    #[test]
    fn broken_globs_are_rejected() {
        let mut j = job();
        j.exclude_patterns = vec!["cache/[".to_string()];
        let err = validate_job(&j).unwrap_err();
        assert!(matches!(err, BackupGenError::ValidationError { ref key, .. } if key == "web"));
    }
}
