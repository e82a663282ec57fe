#![allow(dead_code)]

use std::collections::BTreeMap;

use backupgen::config::{ConfigDocument, RawConfigDocument};
use serde_yaml::{Mapping, Value};

/// Builder for `ConfigDocument` to simplify test setup.
///
/// Goes through the same shape checks as a document read from disk.
pub struct ConfigDocumentBuilder {
    raw: RawConfigDocument,
    services: Mapping,
    defaults: Mapping,
}

impl ConfigDocumentBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawConfigDocument {
                defaults: None,
                services: None,
                paths: None,
                global: BTreeMap::new(),
            },
            services: Mapping::new(),
            defaults: Mapping::new(),
        }
    }

    pub fn with_service(mut self, key: &str, entry: EntryBuilder) -> Self {
        self.services
            .insert(Value::String(key.to_string()), Value::Mapping(entry.build()));
        self
    }

    pub fn with_default(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.defaults
            .insert(Value::String(field.to_string()), value.into());
        self
    }

    pub fn with_global(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.raw.global.insert(field.to_string(), value.into());
        self
    }

    pub fn with_path_list(mut self, dirs: &[&str]) -> Self {
        self.raw.paths = Some(Value::Sequence(
            dirs.iter().map(|d| Value::String(d.to_string())).collect(),
        ));
        self
    }

    pub fn with_path_block(mut self, entry: EntryBuilder) -> Self {
        self.raw.paths = Some(Value::Mapping(entry.build()));
        self
    }

    pub fn build(mut self) -> ConfigDocument {
        if !self.services.is_empty() {
            self.raw.services = Some(Value::Mapping(self.services));
        }
        if !self.defaults.is_empty() {
            self.raw.defaults = Some(Value::Mapping(self.defaults));
        }
        ConfigDocument::try_from(self.raw).expect("Failed to build valid document from builder")
    }
}

impl Default for ConfigDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a service entry or path block mapping.
#[derive(Default)]
pub struct EntryBuilder {
    fields: Mapping,
}

impl EntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dirs(self, dirs: &[&str]) -> Self {
        self.set(
            "dirs",
            Value::Sequence(dirs.iter().map(|d| Value::String(d.to_string())).collect()),
        )
    }

    pub fn exclude(self, patterns: &[&str]) -> Self {
        self.set(
            "exclude_patterns",
            Value::Sequence(patterns.iter().map(|p| Value::String(p.to_string())).collect()),
        )
    }

    pub fn output_dir(self, dir: &str) -> Self {
        self.set("output_dir", dir)
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(Value::String(field.to_string()), value.into());
        self
    }

    pub fn build(self) -> Mapping {
        self.fields
    }
}
