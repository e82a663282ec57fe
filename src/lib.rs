// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod generate;
pub mod logging;
pub mod naming;
pub mod report;
pub mod types;
pub mod units;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, resolve_all, ConfigDocument};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::generate::{Generator, GeneratorOptions};
use crate::report::{GenerationReport, SkippedEntry};
use crate::types::EntryKind;
use crate::units::{require_service, AssumePresent, SystemctlRegistry, UnitRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and shape checks
/// - per-field resolution and validation
/// - unit existence checks
/// - artifact generation
/// - the operator report on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let doc = load_and_validate(&fs, &args.config)?;

    let registry: Box<dyn UnitRegistry> = if args.no_verify {
        info!("skipping service existence checks (--no-verify)");
        Box::new(AssumePresent)
    } else {
        Box::new(SystemctlRegistry::new())
    };

    let generator = Generator::new(
        &fs,
        GeneratorOptions {
            mode: args.mode,
            unit_dir: args.unit_dir,
            config_dir: args.config_dir,
            runner: args.runner,
        },
    );

    let report = generate_all(&doc, registry.as_ref(), &generator, args.dry_run)?;

    crate::report::emit_skipped(&report, &mut std::io::stderr().lock())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    crate::report::emit(&report, &mut out)
}

/// Run every stage after loading: resolve, check, render, write.
///
/// All entries are resolved and validated before the first file is written,
/// so a hard configuration error leaves no new artifacts behind. Services the
/// registry does not know are skipped and recorded in the report. The path
/// block, if any, is always generated last.
pub fn generate_all(
    doc: &ConfigDocument,
    registry: &dyn UnitRegistry,
    generator: &Generator<'_>,
    dry_run: bool,
) -> Result<GenerationReport> {
    let jobs = resolve_all(doc)?;
    debug!(count = jobs.len(), "resolved backup entries");

    let mut report = GenerationReport::new(generator.options().mode, dry_run);

    for job in &jobs {
        if job.kind == EntryKind::Service {
            if let Err(reason) = require_service(registry, &job.key) {
                report.skipped.push(SkippedEntry {
                    key: job.key.clone(),
                    reason,
                });
                continue;
            }
        }

        let planned = if dry_run {
            generator.plan(job)
        } else {
            generator.generate(job)?
        };
        report.artifacts.push(planned);
    }

    info!(
        generated = report.artifacts.len(),
        skipped = report.skipped.len(),
        "generation finished"
    );
    Ok(report)
}

/// Convenience for callers that only have a file system handle.
pub fn generate_from_path(
    fs: &dyn FileSystem,
    config: impl AsRef<std::path::Path>,
    registry: &dyn UnitRegistry,
    options: GeneratorOptions,
    dry_run: bool,
) -> Result<GenerationReport> {
    let doc = load_and_validate(fs, config)?;
    let generator = Generator::new(fs, options);
    generate_all(&doc, registry, &generator, dry_run)
}
