// src/report.rs

//! Operator-facing summary of a generation run.

use std::io::Write;

use crate::errors::{BackupGenError, Result};
use crate::generate::PlannedArtifact;
use crate::generate::quote::shell_word;
use crate::types::GenerationMode;

/// An entry that produced no artifact and why.
#[derive(Debug)]
pub struct SkippedEntry {
    pub key: String,
    pub reason: BackupGenError,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct GenerationReport {
    pub mode: GenerationMode,
    pub dry_run: bool,
    pub artifacts: Vec<PlannedArtifact>,
    pub skipped: Vec<SkippedEntry>,
}

impl GenerationReport {
    pub fn new(mode: GenerationMode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            artifacts: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Write one warning line per skipped entry to `err`.
///
/// Unlike log output this is not subject to the log level: a skipped
/// service is always reported on the operator's error stream.
pub fn emit_skipped(report: &GenerationReport, err: &mut dyn Write) -> Result<()> {
    for skipped in &report.skipped {
        writeln!(err, "warning: skipping '{}': {}", skipped.key, skipped.reason)?;
    }
    Ok(())
}

/// Print the report to `out`.
///
/// Fails with [`BackupGenError::NoArtifactsGenerated`] when nothing was
/// produced; an all-skip run must not look like success.
pub fn emit(report: &GenerationReport, out: &mut dyn Write) -> Result<()> {
    if report.is_empty() {
        return Err(BackupGenError::NoArtifactsGenerated);
    }

    if report.dry_run {
        for planned in &report.artifacts {
            for file in &planned.files {
                writeln!(out, "# ---- {}", file.path.display())?;
                out.write_all(file.contents.as_bytes())?;
                writeln!(out)?;
            }
        }
        writeln!(out, "Dry run: nothing was written.")?;
    }

    writeln!(out, "Generated {} backup job(s):", report.artifacts.len())?;
    for planned in &report.artifacts {
        let names = &planned.artifact.names;
        writeln!(
            out,
            "  {}  config={}  timer={}",
            names.job_name,
            names.fragment_path.display(),
            names.timer_path.display()
        )?;
    }

    if !report.skipped.is_empty() {
        writeln!(out, "Skipped {} entr(ies):", report.skipped.len())?;
        for skipped in &report.skipped {
            writeln!(out, "  {}: {}", skipped.key, skipped.reason)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Next steps:")?;
    if report.mode == GenerationMode::Template {
        writeln!(out, "  # requires an installed backup@.service template")?;
    }
    writeln!(out, "  systemctl daemon-reload")?;
    for planned in &report.artifacts {
        writeln!(
            out,
            "  systemctl enable --now {}",
            shell_word(&planned.artifact.names.timer_unit)
        )?;
    }

    Ok(())
}
