//! `forks list`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use forkstack_lifecycle::{EnvironmentSummary, Lifecycle};

use super::{load_config, providers};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "")]
    active: String,
    #[tabled(rename = "environment")]
    name: String,
    #[tabled(rename = "database")]
    database: String,
    #[tabled(rename = "bucket")]
    bucket: String,
}

impl ListArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let loaded = load_config(config)?;
        let (turso, s3) = providers(&loaded);
        let lifecycle = Lifecycle::new(&loaded, &turso, &s3)?;
        let rows = lifecycle.list().context("failed to list environments")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }
        print_table(&rows);
        Ok(())
    }
}

fn print_table(rows: &[EnvironmentSummary]) {
    if rows.is_empty() {
        println!("No environments found. Run `forks create <env>` to make one.");
        return;
    }
    let table_rows: Vec<ListRow> = rows
        .iter()
        .map(|r| ListRow {
            active: if r.active {
                "*".green().bold().to_string()
            } else {
                String::new()
            },
            name: r.name.to_string(),
            database: presence(r.has_database),
            bucket: presence(r.has_bucket),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn presence(present: bool) -> String {
    if present {
        "■".green().bold().to_string()
    } else {
        "■".bright_black().to_string()
    }
}
