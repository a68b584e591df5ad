//! `forks switch <env>`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use forkstack_core::resolver::normalize_alias;
use forkstack_lifecycle::Lifecycle;

use super::{load_config, print_activation, providers};

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Environment to activate; `production` / `development` are accepted.
    pub env: String,

    /// Show which files would change without writing them.
    #[arg(long)]
    pub dry_run: bool,
}

impl SwitchArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let loaded = load_config(config)?;
        let (turso, s3) = providers(&loaded);
        let lifecycle = Lifecycle::new(&loaded, &turso, &s3)?;

        let env = normalize_alias(&self.env);
        let report = lifecycle
            .switch(&env, self.dry_run)
            .with_context(|| format!("failed to switch to '{env}'"))?;
        print_activation("active", &report, &loaded.root);
        Ok(())
    }
}
