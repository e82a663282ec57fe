// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;

/// Synthetic key of the unnamed `paths` block.
pub const PATHS_KEY: &str = "paths";

/// Top-level document as read from disk, before any shape checks.
///
/// ```yaml
/// retention_days: 7          # global fallback
/// defaults:
///   output_dir: /backup
/// services:
///   web:
///     dirs: [/srv/www]
/// paths: [/etc, /home]
/// ```
///
/// Everything that is not `defaults`, `services` or `paths` lands in
/// `global` and serves as the third precedence tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigDocument {
    #[serde(default)]
    pub defaults: Option<Value>,

    #[serde(default)]
    pub services: Option<Value>,

    #[serde(default)]
    pub paths: Option<Value>,

    #[serde(flatten)]
    pub global: BTreeMap<String, Value>,
}

/// Shape-checked document. Built via `TryFrom<RawConfigDocument>`.
///
/// `services` is kept in a `BTreeMap` so runs are reproducible, but callers
/// must not attach meaning to the order of service entries.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    pub global: FieldSet,
    pub defaults: FieldSet,
    pub services: BTreeMap<String, FieldSet>,
    pub paths: Option<PathsSection>,
}

/// The optional `paths` block.
#[derive(Debug, Clone, PartialEq)]
pub enum PathsSection {
    /// `paths: [/etc, /home]`
    List(Vec<String>),
    /// `paths: { dirs: [...], output_dir: ... }`
    Block(FieldSet),
}

impl PathsSection {
    /// Entry-level fields for the path block. A bare list becomes `dirs`.
    pub fn fields(&self) -> FieldSet {
        match self {
            PathsSection::List(dirs) => {
                let mut set = FieldSet::default();
                set.insert(
                    Field::Dirs.name(),
                    Value::Sequence(dirs.iter().cloned().map(Value::String).collect()),
                );
                set
            }
            PathsSection::Block(set) => set.clone(),
        }
    }

    /// A bare empty list carries no directories and produces no job.
    pub fn is_usable(&self) -> bool {
        match self {
            PathsSection::List(dirs) => !dirs.is_empty(),
            PathsSection::Block(_) => true,
        }
    }
}

/// Raw field values of one precedence tier.
///
/// An explicit `null` is stored but reads as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: BTreeMap<String, Value>,
}

impl FieldSet {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Every tunable field of a backup entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Dirs,
    ExcludePatterns,
    OutputDir,
    CompressionLvl,
    RetentionDays,
    OnCalendar,
    RandomizedDelay,
    Persistent,
    Owner,
    StopWaitSeconds,
    RestartAfterBackup,
    PathMode,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Dirs,
        Field::ExcludePatterns,
        Field::OutputDir,
        Field::CompressionLvl,
        Field::RetentionDays,
        Field::OnCalendar,
        Field::RandomizedDelay,
        Field::Persistent,
        Field::Owner,
        Field::StopWaitSeconds,
        Field::RestartAfterBackup,
        Field::PathMode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Dirs => "dirs",
            Field::ExcludePatterns => "exclude_patterns",
            Field::OutputDir => "output_dir",
            Field::CompressionLvl => "compression_lvl",
            Field::RetentionDays => "retention_days",
            Field::OnCalendar => "on_calendar",
            Field::RandomizedDelay => "randomized_delay",
            Field::Persistent => "persistent",
            Field::Owner => "owner",
            Field::StopWaitSeconds => "stop_wait_seconds",
            Field::RestartAfterBackup => "restart_after_backup",
            Field::PathMode => "path_mode",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}
