//! Config discovery and parse-error tests.

use assert_fs::prelude::*;
use forkstack_core::{config, CoreError, EnvironmentId, ProjectName};
use predicates::prelude::predicate;

#[test]
fn discovers_config_in_parent_directory() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("forkstack.yaml")
        .write_str("project: myproject\n")
        .expect("write config");
    let nested = root.child("src").child("deep");
    nested.create_dir_all().expect("mkdir");

    let loaded = config::discover_at(nested.path()).expect("discover");
    assert_eq!(loaded.config.project, ProjectName::from("myproject"));
    assert_eq!(loaded.root, root.path());
    assert_eq!(loaded.marker_path(), root.path().join(".current-env"));
}

#[test]
fn dotted_config_name_is_accepted() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child(".forkstack.yaml")
        .write_str("project: hidden\n")
        .expect("write config");
    let loaded = config::discover_at(root.path()).expect("discover");
    assert_eq!(loaded.config.project.as_str(), "hidden");
}

#[test]
fn plain_name_wins_over_dotted_name() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("forkstack.yaml").write_str("project: plain\n").expect("write");
    root.child(".forkstack.yaml").write_str("project: dotted\n").expect("write");
    let path = config::find_config_at(root.path()).expect("find");
    root.child("forkstack.yaml").assert(predicate::path::exists());
    assert!(path.ends_with("forkstack.yaml"));
    assert!(!path.to_string_lossy().ends_with(".forkstack.yaml"));
}

#[test]
fn missing_config_names_start_directory() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    // Walking up from a temp dir normally finds nothing; skip if the host has one.
    if config::find_config_at(root.path()).is_ok() {
        return;
    }
    let err = config::discover_at(root.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("forkstack.yaml"));
}

#[test]
fn corrupt_yaml_reports_path() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("forkstack.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");
    let err = config::discover_at(root.path()).unwrap_err();
    assert!(matches!(err, CoreError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("forkstack.yaml"));
}

#[test]
fn missing_project_is_a_parse_error() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("forkstack.yaml")
        .write_str("database:\n  scheme: libsql\n")
        .expect("write");
    let err = config::discover_at(root.path()).unwrap_err();
    assert!(matches!(err, CoreError::Parse { .. }), "got: {err}");
}

#[test]
fn full_config_roundtrip() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("forkstack.yaml")
        .write_str(
            r#"project: shop
database:
  scheme: libsql
  host_suffix: example.turso.io
  group: eu
storage:
  endpoint: https://fly.storage.tigris.dev
  region: auto
secrets:
  project: shop-secrets
protected: [prod, staging]
marker_file: .state/env
env_file: .env.dev
"#,
        )
        .expect("write");

    let loaded = config::discover_at(root.path()).expect("discover");
    let cfg = &loaded.config;
    assert_eq!(cfg.database.host_suffix, "example.turso.io");
    assert_eq!(cfg.database.group.as_deref(), Some("eu"));
    assert_eq!(cfg.storage.region.as_deref(), Some("auto"));
    assert_eq!(cfg.secrets.project.as_deref(), Some("shop-secrets"));
    assert!(cfg.is_protected(&EnvironmentId::from("staging")));
    assert!(!cfg.is_protected(&EnvironmentId::dev()));
    assert_eq!(loaded.env_file_path(), root.path().join(".env.dev"));

    let yaml = serde_yaml::to_string(cfg).expect("serialize");
    let back: forkstack_core::ForkstackConfig = serde_yaml::from_str(&yaml).expect("reparse");
    assert_eq!(&back, cfg);
}
