//! Subcommand implementations and the helpers they share.

pub mod create;
pub mod delete;
pub mod env;
pub mod key;
pub mod list;
pub mod secrets;
pub mod switch;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use forkstack_backends::{S3Cli, TursoCli};
use forkstack_core::config::{self, LoadedConfig};
use forkstack_core::EnvironmentId;
use forkstack_lifecycle::{ActivationReport, WriteResult};

/// Load `--config` when given, otherwise search upward from the cwd.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let loaded = match explicit {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => config::discover().with_context(|| {
            format!(
                "no forkstack.yaml found; create one like:\n\n{}",
                config::example_config()
            )
        })?,
    };
    tracing::debug!("using config {}", loaded.path.display());
    Ok(loaded)
}

/// Provider CLIs configured from `forkstack.yaml`.
pub fn providers(loaded: &LoadedConfig) -> (TursoCli, S3Cli) {
    (
        TursoCli::system(loaded.config.database.group.clone()),
        S3Cli::system(&loaded.config.storage),
    )
}

/// Resolve the environment from `--env`, falling back to `ENV` / marker / `dev`.
pub fn target_env(loaded: &LoadedConfig, explicit: Option<String>) -> EnvironmentId {
    match explicit {
        Some(env) => forkstack_core::resolver::normalize_alias(&env),
        None => forkstack_core::bind(loaded).0.resolve(),
    }
}

pub fn print_activation(verb: &str, report: &ActivationReport, root: &Path) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}{} Environment '{}' {verb}",
        "✓".green().bold(),
        report.environment
    );
    println!("  database  {}", report.resources.database_name);
    println!("  bucket    {}", report.resources.bucket_name);
    print_writes(&report.writes, root);
}

fn print_writes(writes: &[WriteResult], root: &Path) {
    for w in writes {
        let shown = w.path().strip_prefix(root).unwrap_or(w.path());
        match w {
            WriteResult::Written { .. } => println!("  ✎  {}", shown.display()),
            WriteResult::WouldWrite { .. } => println!("  ~  {}", shown.display()),
            WriteResult::Unchanged { .. } => println!("  ·  {}", shown.display()),
        }
    }
}
