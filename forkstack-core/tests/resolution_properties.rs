//! Resolution and naming properties.
//!
//! The `ENV` override is always passed explicitly (`resolve_with`) so tests
//! never mutate process-wide environment variables.

use forkstack_core::{
    config::DatabaseConfig,
    naming::{self, Namer},
    resolver::Resolver,
    EnvironmentId, EnvironmentSource, ProjectName,
};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

fn project() -> ProjectName {
    ProjectName::from("myproject")
}

fn namer() -> Namer {
    Namer::new(project(), DatabaseConfig::default())
}

fn resolver(dir: &TempDir) -> Resolver {
    Resolver::new(dir.path().join(".current-env"))
}

// ---------------------------------------------------------------------------
// 1. Resolver
// ---------------------------------------------------------------------------

#[rstest]
#[case("production", "prod")]
#[case("PRODUCTION", "prod")]
#[case("Production", "prod")]
#[case("prod", "prod")]
#[case("PROD", "prod")]
#[case("development", "dev")]
#[case("DEVELOPMENT", "dev")]
#[case("dev", "dev")]
#[case("Alice", "alice")]
#[case("staging", "staging")]
fn override_is_case_insensitive(#[case] raw: &str, #[case] expected: &str) {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(resolver(&dir).resolve_with(Some(raw)), expected);
}

#[rstest]
#[case("production")]
#[case("PRODUCTION")]
#[case("development")]
#[case("Alice")]
fn override_resolution_is_idempotent(#[case] raw: &str) {
    let dir = TempDir::new().expect("tempdir");
    let r = resolver(&dir);
    let once = r.resolve_with(Some(raw));
    let twice = r.resolve_with(Some(once.as_str()));
    assert_eq!(once, twice);
}

#[test]
fn no_override_no_marker_defaults_to_dev() {
    let dir = TempDir::new().expect("tempdir");
    let (env, source) = resolver(&dir).resolve_from(None);
    assert_eq!(env, "dev");
    assert_eq!(source, EnvironmentSource::Default);
}

#[test]
fn marker_contents_are_trimmed() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(".current-env"), "alice\n").expect("write marker");
    let (env, source) = resolver(&dir).resolve_from(None);
    assert_eq!(env, "alice");
    assert_eq!(source, EnvironmentSource::Marker);
}

#[test]
fn override_wins_over_marker() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(".current-env"), "alice").expect("write marker");
    assert_eq!(resolver(&dir).resolve_with(Some("bob")), "bob");
}

// ---------------------------------------------------------------------------
// 2. Namer
// ---------------------------------------------------------------------------

#[test]
fn bucket_name_format() {
    assert_eq!(
        naming::bucket_name(&project(), &EnvironmentId::from("alice")),
        "myproject-bucket-alice"
    );
}

#[rstest]
#[case("alice", "bob")]
#[case("dev", "prod")]
#[case("a", "a-b")]
fn bucket_name_is_injective_in_env(#[case] a: &str, #[case] b: &str) {
    let n = namer();
    assert_ne!(
        n.bucket_name(&EnvironmentId::from(a)),
        n.bucket_name(&EnvironmentId::from(b))
    );
}

#[test]
fn bucket_name_is_s3_shaped() {
    let bucket = namer().bucket_name(&EnvironmentId::from("test"));
    assert!(bucket.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    assert!(!bucket.starts_with('-') && !bucket.ends_with('-'));
}

#[test]
fn prod_url_has_no_env_token() {
    let url = namer().database_url_with(&EnvironmentId::prod(), None);
    assert!(url.starts_with("libsql://"));
    assert!(url.ends_with(".turso.io"));
    assert!(!url.contains("-prod"));
    assert_eq!(url, "libsql://myproject.turso.io");
}

#[test]
fn dev_url_is_distinct_from_prod() {
    let n = namer();
    let dev = n.database_url_with(&EnvironmentId::dev(), None);
    let prod = n.database_url_with(&EnvironmentId::prod(), None);
    assert!(dev.contains("-dev.") || dev.contains("-dev-"), "got {dev}");
    assert_ne!(dev, prod);
}

#[rstest]
#[case("dev", "myproject.dev.db")]
#[case("alice", "myproject.alice.db")]
#[case("bob", "myproject.bob.db")]
fn local_path_format(#[case] env: &str, #[case] expected: &str) {
    assert_eq!(
        namer().local_path(&EnvironmentId::from(env)).to_string_lossy(),
        expected
    );
}

#[rstest]
#[case("photos", "abc123.jpg", "photos/abc123.jpg")]
#[case("documents", "file.pdf", "documents/file.pdf")]
#[case("backups", "2024-01-01.tar.gz", "backups/2024-01-01.tar.gz")]
#[case("photos", "2024/01/photo.jpg", "photos/2024/01/photo.jpg")]
#[case("data", "nested/path/file.txt", "data/nested/path/file.txt")]
fn object_key_joins_verbatim(#[case] kind: &str, #[case] file: &str, #[case] expected: &str) {
    assert_eq!(naming::object_key(kind, file), expected);
}

// ---------------------------------------------------------------------------
// 3. Round trip
// ---------------------------------------------------------------------------

#[test]
fn resolved_env_flows_into_every_name() {
    let dir = TempDir::new().expect("tempdir");
    let env = resolver(&dir).resolve_with(Some("alice"));
    let names = namer().resources_with(&env, None);

    assert_eq!(names.environment, "alice");
    assert!(names.database_url.contains("alice"));
    assert!(names.bucket_name.contains("alice"));
    assert!(names.local_path.to_string_lossy().contains("alice"));
    assert_eq!(names.database_name, "myproject-alice");
}

#[test]
fn environments_are_isolated() {
    let n = namer();
    let alice = n.resources_with(&EnvironmentId::from("alice"), None);
    let bob = n.resources_with(&EnvironmentId::from("bob"), None);
    assert_ne!(alice.database_url, bob.database_url);
    assert_ne!(alice.bucket_name, bob.bucket_name);
    assert_ne!(alice.local_path, bob.local_path);
}

#[test]
fn bucket_names_parse_back() {
    let n = namer();
    for env in ["dev", "prod", "alice", "feature-42"] {
        let env = EnvironmentId::from(env);
        assert_eq!(n.env_from_bucket_name(&n.bucket_name(&env)), Some(env));
    }
}
