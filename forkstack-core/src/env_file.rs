//! Read access to the cached credentials file (`.env.local`).
//!
//! The file is dotenv-formatted and headed by `# Environment: <env>`. It is
//! written by `forks create` / `forks switch`; application code only reads it.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{io_err, CoreError};
use crate::types::EnvironmentId;

pub const DATABASE_URL_KEY: &str = "DATABASE_URL";
pub const DATABASE_AUTH_TOKEN_KEY: &str = "DATABASE_AUTH_TOKEN";
pub const BUCKET_NAME_KEY: &str = "BUCKET_NAME";

const HEADER_PREFIX: &str = "# Environment:";

/// Parse all `KEY=VALUE` pairs. A missing file yields an empty map.
pub fn read_env_file(path: &Path) -> Result<BTreeMap<String, String>, CoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let iter = dotenvy::from_path_iter(path).map_err(|e| CoreError::EnvFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut vars = BTreeMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| CoreError::EnvFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Environment named in the file's header comment, if any.
pub fn env_file_environment(path: &Path) -> Result<Option<EnvironmentId>, CoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(contents
        .lines()
        .find_map(|line| line.trim().strip_prefix(HEADER_PREFIX))
        .map(str::trim)
        .filter(|env| !env.is_empty())
        .map(EnvironmentId::from))
}
