//! `forks delete <env>`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use forkstack_core::resolver::normalize_alias;
use forkstack_lifecycle::Lifecycle;

use super::{load_config, providers};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Environment to delete. Protected environments are refused.
    pub env: String,
}

impl DeleteArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let loaded = load_config(config)?;
        let (turso, s3) = providers(&loaded);
        let lifecycle = Lifecycle::new(&loaded, &turso, &s3)?;

        let env = normalize_alias(&self.env);
        let report = lifecycle
            .delete(&env)
            .with_context(|| format!("failed to delete environment '{env}'"))?;

        for warning in &report.warnings {
            println!("  {} {}", "⚠".yellow().bold(), warning);
        }
        if report.marker_cleared {
            println!("  ✓ Cleared current environment");
        }
        println!("{} Environment '{}' deleted", "✓".green().bold(), env);
        Ok(())
    }
}
