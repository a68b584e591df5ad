//! `forks create <env>`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use forkstack_core::resolver::normalize_alias;
use forkstack_lifecycle::{CreateOptions, Lifecycle};

use super::{load_config, print_activation, providers};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// New environment name (lowercase letters, digits, '-').
    pub env: String,

    /// Seed the database and bucket from an existing environment.
    #[arg(long, value_name = "ENV")]
    pub from: Option<String>,

    /// Show what would be created without calling any provider mutation.
    #[arg(long)]
    pub dry_run: bool,
}

impl CreateArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let loaded = load_config(config)?;
        let (turso, s3) = providers(&loaded);
        let lifecycle = Lifecycle::new(&loaded, &turso, &s3)?;

        let env = normalize_alias(&self.env);
        let options = CreateOptions {
            from: self.from.as_deref().map(normalize_alias),
            dry_run: self.dry_run,
        };
        let report = lifecycle
            .create(&env, &options)
            .with_context(|| format!("failed to create environment '{env}'"))?;

        print_activation("created", &report, &loaded.root);
        if !report.dry_run {
            println!("\nRestart your app to pick up the new .env.local.");
        }
        Ok(())
    }
}
