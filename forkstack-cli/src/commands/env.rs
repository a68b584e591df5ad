//! `forks env`: which environment is active and what it resolves to.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use forkstack_core::env_file::{env_file_environment, read_env_file, DATABASE_AUTH_TOKEN_KEY};
use forkstack_core::{EnvironmentSource, LoadedConfig, ResourceNames};
use forkstack_renderer::{EnvFileContext, OutputFormat, Renderer};

use super::load_config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvFormat {
    Text,
    Json,
    Dotenv,
    Shell,
}

#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = EnvFormat::Text)]
    pub format: EnvFormat,
}

#[derive(Serialize)]
struct EnvJson<'a> {
    project: &'a str,
    source: String,
    #[serde(flatten)]
    resources: &'a ResourceNames,
}

impl EnvArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let loaded = load_config(config)?;
        let (resolver, namer) = forkstack_core::bind(&loaded);
        let (env, source) = resolver.resolve_with_source();

        // .env.local only describes the environment named in its header.
        let env_file = loaded.env_file_path();
        let cached = env_file_environment(&env_file)
            .with_context(|| format!("failed to read {}", env_file.display()))?;
        if cached.as_ref() == Some(&env) {
            dotenvy::from_path(&env_file)
                .with_context(|| format!("failed to load {}", env_file.display()))?;
        }
        let resources = namer.resources(&env);

        match self.format {
            EnvFormat::Text => print_text(&loaded, &resources, source),
            EnvFormat::Json => {
                let out = EnvJson {
                    project: loaded.config.project.as_str(),
                    source: source.to_string(),
                    resources: &resources,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            EnvFormat::Dotenv | EnvFormat::Shell => {
                let mut ctx = EnvFileContext::from_resources(&resources);
                if cached.as_ref() == Some(&env) {
                    ctx.database_auth_token = cached_token(&loaded)?;
                }
                let format = if self.format == EnvFormat::Shell {
                    OutputFormat::ShellExports
                } else {
                    OutputFormat::Dotenv
                };
                print!("{}", Renderer::new()?.render(&ctx, format)?);
            }
        }
        Ok(())
    }
}

fn cached_token(loaded: &LoadedConfig) -> Result<Option<String>> {
    let vars = read_env_file(&loaded.env_file_path())?;
    Ok(vars.get(DATABASE_AUTH_TOKEN_KEY).cloned())
}

fn print_text(loaded: &LoadedConfig, resources: &ResourceNames, source: EnvironmentSource) {
    println!("project      {}", loaded.config.project);
    println!("environment  {} ({})", resources.environment, source);
    println!("database     {}", resources.database_name);
    println!("url          {}", resources.database_url);
    println!("bucket       {}", resources.bucket_name);
    println!("local path   {}", resources.local_path.display());
}
