// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every path flag can also come from a `BACKUPGEN_*` environment variable;
//! an explicit flag always wins over the environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::GenerationMode;

/// Command-line arguments for `backupgen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "backupgen",
    version,
    about = "Generate backup timers and job configs for supervised services.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the backup configuration document (YAML, or TOML by extension).
    #[arg(long, value_name = "PATH", env = "BACKUPGEN_CONFIG", default_value = "backup.yml")]
    pub config: PathBuf,

    /// Directory receiving the generated timer (and service) units.
    #[arg(
        long,
        value_name = "DIR",
        env = "BACKUPGEN_UNIT_DIR",
        default_value = "/etc/systemd/system"
    )]
    pub unit_dir: PathBuf,

    /// Directory receiving the per-job config fragments.
    #[arg(
        long,
        value_name = "DIR",
        env = "BACKUPGEN_CONFIG_DIR",
        default_value = "/etc/backupgen"
    )]
    pub config_dir: PathBuf,

    /// Backup runner executable referenced by generated services.
    ///
    /// Only used in standalone mode; template mode relies on an installed
    /// `backup@.service`.
    #[arg(
        long,
        value_name = "PATH",
        env = "BACKUPGEN_RUNNER",
        default_value = "/usr/local/bin/backup-runner"
    )]
    pub runner: PathBuf,

    /// Job naming scheme.
    #[arg(long, value_enum, default_value_t = GenerationMode::Standalone)]
    pub mode: GenerationMode,

    /// Do not ask the service manager whether the configured services exist.
    #[arg(long)]
    pub no_verify: bool,

    /// Render everything and print it, but write no files.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BACKUPGEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
