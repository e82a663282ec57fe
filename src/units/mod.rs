// src/units/mod.rs

//! Existence checks against the service manager.
//!
//! The generator only needs one question answered: "is there a loadable
//! unit with this name?". [`UnitRegistry`] is that capability; production
//! uses [`SystemctlRegistry`], tests use [`mock::StaticUnitRegistry`].

pub mod mock;

use std::fmt::Debug;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, error};

use crate::errors::BackupGenError;
use crate::naming::{service_unit, template_unit};
use crate::types::UnitStatus;

/// Something that can tell whether a unit exists.
pub trait UnitRegistry: Debug {
    fn exists(&self, unit: &str) -> bool;
}

/// Asks `systemctl cat` whether a unit (or the template backing an instance)
/// can be loaded.
#[derive(Debug, Clone)]
pub struct SystemctlRegistry {
    program: PathBuf,
}

impl SystemctlRegistry {
    pub fn new() -> Self {
        Self::with_program("systemctl")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemctlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry for SystemctlRegistry {
    fn exists(&self, unit: &str) -> bool {
        let status = Command::new(&self.program)
            .arg("cat")
            .arg("--no-pager")
            .arg("--")
            .arg(unit)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => {
                debug!(unit, success = status.success(), "queried service manager");
                status.success()
            }
            Err(err) => {
                error!(
                    unit,
                    program = %self.program.display(),
                    error = %err,
                    "could not run service manager query"
                );
                false
            }
        }
    }
}

/// Registry that treats every unit as present (`--no-verify`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumePresent;

impl UnitRegistry for AssumePresent {
    fn exists(&self, _unit: &str) -> bool {
        true
    }
}

/// Check the unit behind a service key.
///
/// Found if `<key>.service` exists or, for an instance key `name@inst`, if
/// the template `name@.service` exists.
pub fn check_service(registry: &dyn UnitRegistry, key: &str) -> UnitStatus {
    let unit = service_unit(key);
    if registry.exists(&unit) {
        return UnitStatus::Found;
    }
    if let Some(template) = template_unit(key) {
        if registry.exists(&template) {
            debug!(%unit, %template, "instance resolved through template");
            return UnitStatus::Found;
        }
    }
    UnitStatus::NotFound
}

/// Like [`check_service`], but produces the skip reason for a missing unit.
///
/// The operator-facing warning is written by [`crate::report::emit_skipped`].
pub fn require_service(registry: &dyn UnitRegistry, key: &str) -> Result<(), BackupGenError> {
    match check_service(registry, key) {
        UnitStatus::Found => Ok(()),
        UnitStatus::NotFound => {
            let unit = service_unit(key);
            debug!(service = %key, %unit, "service unit not found; skipping backup job");
            Err(BackupGenError::ServiceNotFound(unit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock::StaticUnitRegistry;

    #[test]
    fn exact_unit_is_found() {
        let reg = StaticUnitRegistry::with_units(["web.service"]);
        assert_eq!(check_service(&reg, "web"), UnitStatus::Found);
        assert_eq!(check_service(&reg, "db"), UnitStatus::NotFound);
    }

    #[test]
    fn instance_falls_back_to_template() {
        let reg = StaticUnitRegistry::with_units(["postgres@.service"]);
        assert_eq!(check_service(&reg, "postgres@main"), UnitStatus::Found);
        assert_eq!(check_service(&reg, "redis@main"), UnitStatus::NotFound);
        assert_eq!(reg.queries(), vec![
            "postgres@main.service".to_string(),
            "postgres@.service".to_string(),
            "redis@main.service".to_string(),
            "redis@.service".to_string(),
        ]);
    }

    #[test]
    fn missing_service_is_a_non_fatal_error() {
        let reg = StaticUnitRegistry::default();
        let err = require_service(&reg, "gone").unwrap_err();
        assert!(matches!(err, BackupGenError::ServiceNotFound(ref u) if u == "gone.service"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn unrunnable_systemctl_reports_not_found() {
        let reg = SystemctlRegistry::with_program("/nonexistent/backupgen-systemctl");
        assert!(!reg.exists("web.service"));
    }
}
