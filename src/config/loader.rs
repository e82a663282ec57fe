// src/config/loader.rs

use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::config::model::{ConfigDocument, RawConfigDocument};
use crate::errors::{BackupGenError, Result};
use crate::fs::FileSystem;

/// On-disk syntax of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load a document from `path` and return the raw `RawConfigDocument`.
///
/// This only parses; it does **not** check the shape of `services`,
/// `defaults` or `paths`. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigDocument> {
    let path = path.as_ref();
    let bytes = fs
        .read(path)?
        .ok_or_else(|| BackupGenError::ConfigNotFound(path.to_path_buf()))?;

    let format = ConfigFormat::from_path(path);
    debug!(path = %path.display(), ?format, "parsing config document");

    let parse_error = |message: String| BackupGenError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let contents = String::from_utf8(bytes)
        .map_err(|e| parse_error(format!("document is not valid UTF-8: {}", e.utf8_error())))?;

    let value: Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
        ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
    };

    match value {
        Value::Null => Ok(RawConfigDocument::default()),
        Value::Mapping(_) => serde_yaml::from_value(value).map_err(|e| {
            BackupGenError::SchemaError(format!("document root: {e}"))
        }),
        _ => Err(BackupGenError::SchemaError(
            "document root must be a mapping".to_string(),
        )),
    }
}

/// Load a document from `path` and check its shape.
///
/// This is the recommended entry point for the rest of the application:
///
/// - `ConfigNotFound` if nothing exists at `path`.
/// - `ConfigParse` if the YAML/TOML is malformed.
/// - `SchemaError` if `services`, `defaults` or `paths` have the wrong shape.
///
/// Field values are not resolved here; see [`crate::config::resolve_all`].
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigDocument> {
    let raw = load_from_path(fs, &path)?;
    ConfigDocument::try_from(raw)
}
