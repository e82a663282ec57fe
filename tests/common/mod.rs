#![allow(dead_code)]

use std::path::{Path, PathBuf};

use backupgen::generate::GeneratorOptions;
use backupgen::types::GenerationMode;

pub use backupgen_test_utils::init_tracing;

pub fn options(mode: GenerationMode, root: &Path) -> GeneratorOptions {
    GeneratorOptions {
        mode,
        unit_dir: root.join("units"),
        config_dir: root.join("conf"),
        runner: PathBuf::from("/usr/local/bin/backup-runner"),
    }
}
