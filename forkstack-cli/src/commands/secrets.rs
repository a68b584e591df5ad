//! `forks secrets get|list|set|delete`

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use forkstack_backends::{DopplerSecrets, SecretStore, WithEnvFallback};

use super::{load_config, target_env};

#[derive(Subcommand, Debug)]
pub enum SecretsCommand {
    /// Print one secret; falls back to a same-named environment variable.
    Get {
        key: String,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print every secret of the environment.
    List {
        #[command(flatten)]
        target: TargetArgs,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Create or update a secret.
    Set {
        key: String,
        value: String,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Remove a secret.
    Delete {
        key: String,
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Environment to act on (default: the active environment).
    #[arg(long, value_name = "ENV")]
    pub env: Option<String>,
}

pub fn run(cmd: SecretsCommand, config: Option<&Path>) -> Result<()> {
    let loaded = load_config(config)?;
    let store = WithEnvFallback::new(DopplerSecrets::system(loaded.config.secrets.project.clone()));

    match cmd {
        SecretsCommand::Get { key, target } => {
            let env = target_env(&loaded, target.env);
            let value = store
                .get_secret(&key, &env)
                .with_context(|| format!("failed to read secret {key} for '{env}'"))?;
            println!("{value}");
        }
        SecretsCommand::List { target, json } => {
            let env = target_env(&loaded, target.env);
            let all = store
                .get_all_secrets(&env)
                .with_context(|| format!("failed to list secrets for '{env}'"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for (key, value) in &all {
                    println!("{key}={value}");
                }
            }
        }
        SecretsCommand::Set { key, value, target } => {
            let env = target_env(&loaded, target.env);
            store
                .set_secret(&key, &value, &env)
                .with_context(|| format!("failed to set secret {key} for '{env}'"))?;
            println!("{} Set {} in '{}'", "✓".green().bold(), key, env);
        }
        SecretsCommand::Delete { key, target } => {
            let env = target_env(&loaded, target.env);
            store
                .delete_secret(&key, &env)
                .with_context(|| format!("failed to delete secret {key} from '{env}'"))?;
            println!("{} Deleted {} from '{}'", "✓".green().bold(), key, env);
        }
    }
    Ok(())
}
