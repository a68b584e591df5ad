//! `forks env`, `forks key` and the failure paths that never reach a provider.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn forks(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forks"));
    cmd.current_dir(dir)
        .env_remove("ENV")
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn project(yaml: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("forkstack.yaml"), yaml).expect("write config");
    dir
}

fn env_json(dir: &Path, configure: impl FnOnce(&mut Command)) -> serde_json::Value {
    let mut cmd = forks(dir);
    cmd.args(["env", "--format", "json"]);
    configure(&mut cmd);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("json output")
}

#[test]
fn env_defaults_to_dev() {
    let dir = project("project: shop\n");
    let json = env_json(dir.path(), |_| {});
    assert_eq!(json["environment"], "dev");
    assert_eq!(json["source"], "default");
    assert_eq!(json["database_url"], "libsql://shop-dev.turso.io");
    assert_eq!(json["bucket_name"], "shop-bucket-dev");
    assert_eq!(json["local_path"], "shop.dev.db");
}

#[test]
fn env_override_alias_beats_marker() {
    let dir = project("project: shop\n");
    fs::write(dir.path().join(".current-env"), "alice").unwrap();
    let json = env_json(dir.path(), |cmd| {
        cmd.env("ENV", "Production");
    });
    assert_eq!(json["environment"], "prod");
    assert_eq!(json["source"], "override");
    assert_eq!(json["database_url"], "libsql://shop.turso.io");
}

#[test]
fn env_reads_marker_from_subdirectory() {
    let dir = project("project: shop\ndatabase:\n  scheme: postgres\n  host_suffix: db.internal\n");
    fs::write(dir.path().join(".current-env"), "alice\n").unwrap();
    let nested = dir.path().join("src").join("app");
    fs::create_dir_all(&nested).unwrap();

    forks(&nested)
        .arg("env")
        .assert()
        .success()
        .stdout(contains("alice (marker)"))
        .stdout(contains("postgres://shop-alice.db.internal"));
}

#[test]
fn database_url_variable_wins() {
    let dir = project("project: shop\n");
    let json = env_json(dir.path(), |cmd| {
        cmd.env("DATABASE_URL", "libsql://custom-url.turso.io");
    });
    assert_eq!(json["environment"], "dev");
    assert_eq!(json["database_url"], "libsql://custom-url.turso.io");
}

#[test]
fn shell_format_uses_cached_credentials_for_active_env() {
    let dir = project("project: shop\n");
    fs::write(dir.path().join(".current-env"), "alice").unwrap();
    fs::write(
        dir.path().join(".env.local"),
        "# Environment: alice\n\
         DATABASE_URL=libsql://shop-alice-acme.turso.io\n\
         DATABASE_AUTH_TOKEN=tok-1\n\
         BUCKET_NAME=shop-bucket-alice\n",
    )
    .unwrap();

    forks(dir.path())
        .args(["env", "--format", "shell"])
        .assert()
        .success()
        .stdout(contains("export FORKSTACK_ENV='alice'"))
        .stdout(contains("export DATABASE_URL='libsql://shop-alice-acme.turso.io'"))
        .stdout(contains("export DATABASE_AUTH_TOKEN='tok-1'"));
}

#[test]
fn stale_env_file_is_ignored() {
    let dir = project("project: shop\n");
    fs::write(
        dir.path().join(".env.local"),
        "# Environment: bob\nDATABASE_URL=libsql://shop-bob.turso.io\nDATABASE_AUTH_TOKEN=tok-bob\n",
    )
    .unwrap();

    forks(dir.path())
        .args(["env", "--format", "dotenv"])
        .assert()
        .success()
        .stdout(contains("DATABASE_URL=libsql://shop-dev.turso.io"))
        .stdout(contains("tok-bob").not());
}

#[test]
fn key_joins_verbatim() {
    let dir = TempDir::new().unwrap();
    forks(dir.path())
        .args(["key", "photos", "2024/01/photo.jpg"])
        .assert()
        .success()
        .stdout("photos/2024/01/photo.jpg\n");
}

#[test]
fn key_uri_uses_active_bucket() {
    let dir = project("project: shop\n");
    forks(dir.path())
        .args(["key", "backups", "db.tar.gz", "--uri"])
        .env("ENV", "alice")
        .assert()
        .success()
        .stdout("s3://shop-bucket-alice/backups/db.tar.gz\n");
}

#[test]
fn missing_config_explains_itself() {
    let dir = TempDir::new().unwrap();
    forks(dir.path())
        .arg("env")
        .assert()
        .code(1)
        .stderr(contains("no forkstack.yaml found"))
        .stderr(contains("project: myproject"));
}

#[test]
fn explicit_config_flag() {
    let dir = project("project: shop\n");
    let elsewhere = TempDir::new().unwrap();
    let config = dir.path().join("forkstack.yaml");
    forks(elsewhere.path())
        .args(["env", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("shop-bucket-dev"));
}

#[test]
fn delete_protected_environment_fails() {
    let dir = project("project: shop\n");
    forks(dir.path())
        .args(["delete", "dev"])
        .assert()
        .code(1)
        .stderr(contains("protected"));
}

#[test]
fn delete_normalizes_alias_before_protection_check() {
    let dir = project("project: shop\n");
    forks(dir.path())
        .args(["delete", "production"])
        .assert()
        .code(1)
        .stderr(contains("cannot delete protected environment 'prod'"));
}

#[test]
fn create_rejects_invalid_name() {
    let dir = project("project: shop\n");
    forks(dir.path())
        .args(["create", "Not_Valid"])
        .assert()
        .code(1)
        .stderr(contains("invalid environment name"));
    assert!(!dir.path().join(".current-env").exists());
}

#[test]
fn secrets_get_falls_back_to_environment_variable() {
    let dir = project("project: shop\n");
    let empty_path = TempDir::new().unwrap();
    forks(dir.path())
        .args(["secrets", "get", "FORKSTACK_TEST_SECRET"])
        .env("PATH", empty_path.path())
        .env("FORKSTACK_TEST_SECRET", "from-env")
        .assert()
        .success()
        .stdout("from-env\n");
}
