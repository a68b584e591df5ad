//! forks: per-developer environments over a branching database, one bucket
//! per environment and a secrets manager.
//!
//! # Usage
//!
//! ```text
//! forks create <env> [--from <env>] [--dry-run]
//! forks switch <env> [--dry-run]
//! forks delete <env>
//! forks list [--json]
//! forks env [--format text|json|dotenv|shell]
//! forks key <resource_type> <filename> [--uri]
//! forks secrets get|list|set|delete
//! ```
//!
//! Global flags: `--config <path>` and `-v/--verbose`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    create::CreateArgs, delete::DeleteArgs, env::EnvArgs, key::KeyArgs, list::ListArgs,
    secrets::SecretsCommand, switch::SwitchArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "forks",
    version,
    about = "Create, switch and inspect isolated database + storage environments",
    long_about = None,
)]
struct Cli {
    /// Path to forkstack.yaml (default: search upward from the current directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Provision a database branch and bucket, then switch to them.
    Create(CreateArgs),

    /// Point .env.local and the marker file at an existing environment.
    Switch(SwitchArgs),

    /// Destroy an environment's database branch and bucket.
    Delete(DeleteArgs),

    /// List environments found at the providers.
    List(ListArgs),

    /// Show the active environment and its derived resource names.
    Env(EnvArgs),

    /// Print the object key for a resource type and file name.
    Key(KeyArgs),

    /// Read and write secrets for an environment.
    Secrets {
        #[command(subcommand)]
        command: SecretsCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Create(args) => args.run(config),
        Commands::Switch(args) => args.run(config),
        Commands::Delete(args) => args.run(config),
        Commands::List(args) => args.run(config),
        Commands::Env(args) => args.run(config),
        Commands::Key(args) => args.run(config),
        Commands::Secrets { command } => commands::secrets::run(command, config),
    }
}

/// Send log records (including those of the library crates) to stderr.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
