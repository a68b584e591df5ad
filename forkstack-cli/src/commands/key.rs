//! `forks key <resource_type> <filename>`

use std::path::Path;

use anyhow::Result;
use clap::Args;

use forkstack_core::naming::object_key;

use super::load_config;

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Top-level prefix such as `photos` or `backups`.
    pub resource_type: String,

    /// File name; nested `/` separators are kept.
    pub filename: String,

    /// Print a full `s3://bucket/key` URI for the active environment.
    #[arg(long)]
    pub uri: bool,
}

impl KeyArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let key = object_key(&self.resource_type, &self.filename);
        if !self.uri {
            println!("{key}");
            return Ok(());
        }
        let loaded = load_config(config)?;
        let (resolver, namer) = forkstack_core::bind(&loaded);
        let bucket = namer.bucket_name(&resolver.resolve());
        println!("s3://{bucket}/{key}");
        Ok(())
    }
}
