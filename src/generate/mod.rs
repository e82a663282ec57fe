// src/generate/mod.rs

//! Artifact generation.
//!
//! For each resolved [`BackupJob`] the generator renders an execution-config
//! fragment, a timer, and (standalone mode only) the oneshot job unit the
//! timer fires. Files are overwritten unconditionally.

pub mod quote;
pub mod render;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::BackupJob;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::naming::JobNames;
use crate::types::GenerationMode;

pub use render::{render_fragment, render_job_unit, render_timer};

/// Where and how artifacts are produced.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub mode: GenerationMode,
    pub unit_dir: PathBuf,
    pub config_dir: PathBuf,
    /// Backup runner referenced by standalone job units.
    pub runner: PathBuf,
}

/// One generated job: its key plus every derived name and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub key: String,
    pub names: JobNames,
}

/// A file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// An artifact together with its rendered files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    pub artifact: Artifact,
    pub files: Vec<RenderedFile>,
}

pub struct Generator<'a> {
    fs: &'a dyn FileSystem,
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    pub fn new(fs: &'a dyn FileSystem, options: GeneratorOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Render every file for `job` without touching the file system.
    pub fn plan(&self, job: &BackupJob) -> PlannedArtifact {
        let names = JobNames::derive(
            &job.key,
            job.kind,
            self.options.mode,
            &self.options.unit_dir,
            &self.options.config_dir,
        );

        let mut files = vec![RenderedFile {
            path: names.fragment_path.clone(),
            contents: render_fragment(job, &names),
        }];
        if let Some(path) = &names.job_unit_path {
            files.push(RenderedFile {
                path: path.clone(),
                contents: render_job_unit(job, &names, &self.options.runner),
            });
        }
        files.push(RenderedFile {
            path: names.timer_path.clone(),
            contents: render_timer(job, &names),
        });

        PlannedArtifact {
            artifact: Artifact {
                key: job.key.clone(),
                names,
            },
            files,
        }
    }

    /// Write a planned artifact, creating directories as needed.
    pub fn write(&self, planned: &PlannedArtifact) -> Result<()> {
        for file in &planned.files {
            debug!(path = %file.path.display(), bytes = file.contents.len(), "writing");
            self.fs.write(&file.path, file.contents.as_bytes())?;
        }
        info!(job = %planned.artifact.names.job_name, "generated backup job");
        Ok(())
    }

    /// [`plan`](Self::plan) followed by [`write`](Self::write).
    pub fn generate(&self, job: &BackupJob) -> Result<PlannedArtifact> {
        let planned = self.plan(job);
        self.write(&planned)?;
        Ok(planned)
    }
}
