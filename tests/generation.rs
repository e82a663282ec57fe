mod common;

use std::path::{Path, PathBuf};

use backupgen::errors::BackupGenError;
use backupgen::fs::mock::MockFileSystem;
use backupgen::generate::Generator;
use backupgen::generate_all;
use backupgen::report;
use backupgen::types::GenerationMode;
use backupgen::units::mock::StaticUnitRegistry;
use backupgen_test_utils::builders::{ConfigDocumentBuilder, EntryBuilder};

use common::{init_tracing, options};

#[test]
fn service_inherits_defaults_and_builtins() {
    init_tracing();
    let doc = ConfigDocumentBuilder::new()
        .with_service("web", EntryBuilder::new().dirs(&["/srv/www"]).output_dir("/backup/web"))
        .with_default("retention_days", 30)
        .build();

    let fs = MockFileSystem::new();
    let registry = StaticUnitRegistry::with_units(["web.service"]);
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));

    let report = generate_all(&doc, &registry, &generator, false).unwrap();
    assert_eq!(report.artifacts.len(), 1);

    let fragment = fs.contents("/conf/web.conf").unwrap();
    assert!(fragment.contains("BACKUP_RETENTION_DAYS=30\n"));
    assert!(fragment.contains("BACKUP_LEVEL=3\n"));
    assert!(fragment.contains("BACKUP_DIRS=('/srv/www')\n"));
    assert!(fragment.contains("SERVICE_NAME='web.service'\n"));
    assert!(fragment.contains("RESTART_AFTER_BACKUP=true\n"));

    let timer = fs.contents("/units/backup-web.timer").unwrap();
    assert!(timer.contains("OnCalendar=*-*-* 11:30:00\n"));
    assert!(timer.contains("RandomizedDelaySec=15m\n"));
    assert!(timer.contains("Unit=backup-web.service\n"));

    let service = fs.contents("/units/backup-web.service").unwrap();
    assert!(service.contains("ExecStart=/usr/local/bin/backup-runner /conf/web.conf\n"));
}

#[test]
fn path_list_uses_global_output_dir_and_never_restarts() {
    init_tracing();
    let doc = ConfigDocumentBuilder::new()
        .with_path_list(&["/etc", "/home"])
        .with_global("output_dir", "/backup/misc")
        .with_global("restart_after_backup", true)
        .with_default("restart_after_backup", "yes")
        .build();

    let fs = MockFileSystem::new();
    let registry = StaticUnitRegistry::default();
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));

    let report = generate_all(&doc, &registry, &generator, false).unwrap();
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].artifact.names.job_name, "backup-paths");
    assert!(registry.queries().is_empty(), "paths block needs no unit check");

    let fragment = fs.contents("/conf/paths.conf").unwrap();
    assert!(fragment.contains("RESTART_AFTER_BACKUP=false\n"));
    assert!(fragment.contains("SERVICE_NAME=''\n"));
    assert!(fragment.contains("BACKUP_DIR='/backup/misc'\n"));
    assert!(fragment.contains("BACKUP_DIRS=('/etc' '/home')\n"));
}

#[test]
fn missing_service_is_skipped_and_others_still_generate() {
    init_tracing();
    let doc = ConfigDocumentBuilder::new()
        .with_default("output_dir", "/backup")
        .with_service("web", EntryBuilder::new().dirs(&["/srv/www"]))
        .with_service("retired", EntryBuilder::new().dirs(&["/srv/old"]))
        .with_service("db", EntryBuilder::new().dirs(&["/var/lib/db"]))
        .build();

    let fs = MockFileSystem::new();
    let registry = StaticUnitRegistry::with_units(["web.service", "db.service"]);
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));

    let report = generate_all(&doc, &registry, &generator, false).unwrap();

    let mut generated: Vec<&str> = report
        .artifacts
        .iter()
        .map(|p| p.artifact.key.as_str())
        .collect();
    generated.sort();
    assert_eq!(generated, vec!["db", "web"]);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].key, "retired");
    assert!(matches!(report.skipped[0].reason, BackupGenError::ServiceNotFound(_)));
    assert!(fs.contents("/conf/retired.conf").is_none());
}

#[test]
fn all_skipped_fails_with_no_artifacts() {
    init_tracing();
    let doc = ConfigDocumentBuilder::new()
        .with_service("ghost", EntryBuilder::new().dirs(&["/srv"]).output_dir("/backup"))
        .build();

    let fs = MockFileSystem::new();
    let registry = StaticUnitRegistry::default();
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));

    let report = generate_all(&doc, &registry, &generator, false).unwrap();
    let mut out = Vec::new();
    let err = report::emit(&report, &mut out).unwrap_err();
    assert!(matches!(err, BackupGenError::NoArtifactsGenerated));
    assert!(err.is_fatal());
}

#[test]
fn empty_document_fails_with_no_artifacts() {
    let doc = ConfigDocumentBuilder::new().build();
    let fs = MockFileSystem::new();
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));

    let report = generate_all(&doc, &StaticUnitRegistry::default(), &generator, false).unwrap();
    let err = report::emit(&report, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, BackupGenError::NoArtifactsGenerated));
}

#[test]
fn template_mode_escapes_instance_names() {
    init_tracing();
    let doc = ConfigDocumentBuilder::new()
        .with_service(
            "postgres@main",
            EntryBuilder::new().dirs(&["/var/lib/postgresql"]).output_dir("/backup/pg"),
        )
        .build();

    let fs = MockFileSystem::new();
    let registry = StaticUnitRegistry::with_units(["postgres@.service"]);
    let generator = Generator::new(&fs, options(GenerationMode::Template, Path::new("/")));

    let report = generate_all(&doc, &registry, &generator, false).unwrap();
    let names = &report.artifacts[0].artifact.names;
    assert_eq!(names.job_name, "backup@postgres\\x40main");
    assert_eq!(names.service_unit.as_deref(), Some("postgres@main.service"));

    assert_eq!(
        fs.paths(),
        vec![
            PathBuf::from("/conf/postgres\\x40main.conf"),
            PathBuf::from("/units/backup@postgres\\x40main.timer"),
        ]
    );
    let timer = fs.contents("/units/backup@postgres\\x40main.timer").unwrap();
    assert!(timer.contains("Unit=backup@postgres\\x40main.service\n"));
}

#[test]
fn paths_block_is_generated_after_services() {
    let doc = ConfigDocumentBuilder::new()
        .with_global("output_dir", "/backup")
        .with_path_block(EntryBuilder::new().dirs(&["/etc"]).set("on_calendar", "weekly"))
        .with_service("zz-last-alphabetically", EntryBuilder::new().dirs(&["/srv"]))
        .with_service("aa", EntryBuilder::new().dirs(&["/srv/aa"]))
        .build();

    let fs = MockFileSystem::new();
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));
    let report = generate_all(&doc, &backupgen::units::AssumePresent, &generator, false).unwrap();

    assert_eq!(report.artifacts.len(), 3);
    assert_eq!(report.artifacts.last().unwrap().artifact.key, "paths");
    let timer = fs.contents("/units/backup-paths.timer").unwrap();
    assert!(timer.contains("OnCalendar=weekly\n"));
}

#[test]
fn dry_run_writes_nothing() {
    let doc = ConfigDocumentBuilder::new()
        .with_service("web", EntryBuilder::new().dirs(&["/srv/www"]).output_dir("/backup"))
        .build();

    let fs = MockFileSystem::new();
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));
    let report = generate_all(&doc, &backupgen::units::AssumePresent, &generator, true).unwrap();

    assert!(fs.paths().is_empty());
    let mut out = Vec::new();
    report::emit(&report, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("# ---- /conf/web.conf\n"));
    assert!(text.contains("Dry run: nothing was written."));
}

#[test]
fn hard_error_writes_nothing_even_for_valid_entries() {
    let doc = ConfigDocumentBuilder::new()
        .with_default("output_dir", "/backup")
        .with_service("aa-valid", EntryBuilder::new().dirs(&["/srv"]))
        .with_service("zz-broken", EntryBuilder::new().dirs(&["/srv"]).set("path_mode", "flat"))
        .build();

    let fs = MockFileSystem::new();
    let generator = Generator::new(&fs, options(GenerationMode::Standalone, Path::new("/")));
    let err = generate_all(&doc, &backupgen::units::AssumePresent, &generator, false).unwrap_err();

    assert!(matches!(err, BackupGenError::ValidationError { ref key, .. } if key == "zz-broken"));
    assert!(fs.paths().is_empty());
}
