// src/generate/render.rs

//! Text rendering for fragments and unit files.
//!
//! Output depends only on the resolved job and its derived names, never on
//! time or environment, so regenerating unchanged input is byte-identical.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::BackupJob;
use crate::generate::quote::{exec_arg, shell_quote, unit_value};
use crate::naming::JobNames;
use crate::types::EntryKind;

pub const HEADER: &str = "# Generated by backupgen. Manual changes are overwritten on the next run.";

/// Execution-config fragment consumed by the backup runner.
pub fn render_fragment(job: &BackupJob, names: &JobNames) -> String {
    let service = names.service_unit.as_deref().unwrap_or("");

    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    assign(&mut out, "SERVICE_NAME", &shell_quote(service));
    assign(&mut out, "BACKUP_DIR", &shell_quote(&job.output_dir));
    assign(&mut out, "BACKUP_LEVEL", &job.compression_lvl.to_string());
    assign(&mut out, "BACKUP_RETENTION_DAYS", &job.retention_days.to_string());
    assign(&mut out, "BACKUP_PREFIX", &shell_quote(&job.key));
    assign(&mut out, "BACKUP_OWNER", &shell_quote(&job.owner));
    assign(&mut out, "STOP_WAIT_SECONDS", &job.stop_wait_seconds.to_string());
    assign(&mut out, "RESTART_AFTER_BACKUP", bool_word(job.restart_after_backup));
    assign(&mut out, "PATH_MODE", &shell_quote(job.path_mode.as_str()));
    assign(&mut out, "BACKUP_DIRS", &shell_array(&job.dirs));
    assign(&mut out, "EXCLUDE_PATTERNS", &shell_array(&job.exclude_patterns));
    out
}

/// Standalone oneshot unit that runs the backup runner on the fragment.
pub fn render_job_unit(job: &BackupJob, names: &JobNames, runner: &Path) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str("[Unit]\n");
    let _ = writeln!(out, "Description={}", unit_value(&describe(job, names)));
    out.push('\n');
    out.push_str("[Service]\n");
    out.push_str("Type=oneshot\n");
    let _ = writeln!(
        out,
        "ExecStart={} {}",
        exec_arg(&runner.to_string_lossy()),
        exec_arg(&names.fragment_path.to_string_lossy())
    );
    out
}

/// Scheduled-job unit pointing at the job unit.
pub fn render_timer(job: &BackupJob, names: &JobNames) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str("[Unit]\n");
    let _ = writeln!(out, "Description={}", unit_value(&format!("Schedule for {}", describe(job, names))));
    out.push('\n');
    out.push_str("[Timer]\n");
    let _ = writeln!(out, "OnCalendar={}", job.on_calendar.trim());
    let _ = writeln!(out, "Persistent={}", bool_word(job.persistent));
    let _ = writeln!(out, "RandomizedDelaySec={}", job.randomized_delay.trim());
    let _ = writeln!(out, "Unit={}", names.job_unit);
    out.push('\n');
    out.push_str("[Install]\n");
    out.push_str("WantedBy=timers.target\n");
    out
}

fn describe(job: &BackupJob, names: &JobNames) -> String {
    match (job.kind, names.service_unit.as_deref()) {
        (EntryKind::Service, Some(unit)) => format!("backup of {unit}"),
        _ => format!("backup of {}", job.dirs.join(", ")),
    }
}

fn assign(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "{name}={value}");
}

fn shell_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| shell_quote(s)).collect();
    format!("({})", quoted.join(" "))
}

fn bool_word(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}
