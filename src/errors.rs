// src/errors.rs

//! Crate-wide error type.
//!
//! Everything except [`BackupGenError::ServiceNotFound`] is fatal for a run.
//! A missing service only ever travels inside a skip record so the rest of
//! the configuration can still be generated.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupGenError {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("failed to parse config {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("schema error: {0}")]
    SchemaError(String),

    #[error("invalid configuration for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("service unit not found: {0}")]
    ServiceNotFound(String),

    #[error("no backup jobs were generated (every entry was skipped or none is configured)")]
    NoArtifactsGenerated,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackupGenError {
    /// Shorthand for a [`BackupGenError::ValidationError`] on `key`.
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        BackupGenError::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BackupGenError::ServiceNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, BackupGenError>;

/// One-line operator diagnostic: the error followed by its whole cause
/// chain, joined with `: `.
pub fn diagnostic(err: &anyhow::Error) -> String {
    format!("backupgen error: {err:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn diagnostic_keeps_the_os_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let inner: std::result::Result<(), _> = Err(io);
        let err = BackupGenError::from(inner.context("creating dir \"/etc/backupgen\"").unwrap_err());

        let line = diagnostic(&anyhow::Error::from(err));
        assert_eq!(
            line,
            "backupgen error: creating dir \"/etc/backupgen\": Permission denied"
        );
        assert!(!line.contains('\n'));
    }

    #[test]
    fn service_not_found_is_the_only_non_fatal_error() {
        assert!(!BackupGenError::ServiceNotFound("web.service".into()).is_fatal());
        assert!(BackupGenError::NoArtifactsGenerated.is_fatal());
        assert!(BackupGenError::validation("web", "bad").is_fatal());
    }
}
