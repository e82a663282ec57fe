// src/config/mod.rs

//! Configuration loading, defaulting and validation for backupgen.
//!
//! Responsibilities:
//! - Define the document data model (`model.rs`).
//! - Load a document from disk as YAML or TOML (`loader.rs`).
//! - Check document shape and resolved field values (`validate.rs`).
//! - Resolve every field through entry > defaults > global > built-in
//!   (`resolve.rs`).

pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, ConfigFormat};
pub use model::{ConfigDocument, Field, FieldSet, PathsSection, RawConfigDocument};
pub use resolve::{resolve_all, BackupJob, Resolver, Tier};
pub use validate::validate_job;
