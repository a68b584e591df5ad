//! `forkstack.yaml` configuration.
//!
//! # Discovery
//!
//! [`discover_at`] walks from a start directory up to the filesystem root and
//! picks the first directory holding `forkstack.yaml` or `.forkstack.yaml`.
//! That directory becomes the project root: `marker_file` and `env_file` are
//! resolved against it.
//!
//! # API pattern
//!
//! - `discover_at(start)`: explicit start directory; used in tests with `TempDir`
//! - `discover()`: starts from `std::env::current_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::{EnvironmentId, ProjectName};

/// File names searched for in each directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["forkstack.yaml", ".forkstack.yaml"];

pub const DEFAULT_MARKER_FILE: &str = ".current-env";
pub const DEFAULT_ENV_FILE: &str = ".env.local";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Root of `forkstack.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkstackConfig {
    pub project: ProjectName,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    /// Environments that `delete` refuses to touch.
    #[serde(default = "default_protected")]
    pub protected: Vec<EnvironmentId>,
    #[serde(default = "default_marker_file")]
    pub marker_file: PathBuf,
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

/// Connection-URL shape and branch placement for the database provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_host_suffix")]
    pub host_suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Object-storage endpoint settings forwarded to the storage CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Secrets-manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// Secrets-manager project; the CLI's own default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

fn default_protected() -> Vec<EnvironmentId> {
    vec![EnvironmentId::dev(), EnvironmentId::prod()]
}

fn default_marker_file() -> PathBuf {
    PathBuf::from(DEFAULT_MARKER_FILE)
}

fn default_env_file() -> PathBuf {
    PathBuf::from(DEFAULT_ENV_FILE)
}

fn default_scheme() -> String {
    "libsql".to_string()
}

fn default_host_suffix() -> String {
    "turso.io".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host_suffix: default_host_suffix(),
            group: None,
        }
    }
}

impl ForkstackConfig {
    /// A config for `project` with every other field at its default.
    pub fn for_project(project: impl Into<ProjectName>) -> Self {
        Self {
            project: project.into(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            secrets: SecretsConfig::default(),
            protected: default_protected(),
            marker_file: default_marker_file(),
            env_file: default_env_file(),
        }
    }

    pub fn is_protected(&self, env: &EnvironmentId) -> bool {
        self.protected.contains(env)
    }
}

// ---------------------------------------------------------------------------
// Loaded config
// ---------------------------------------------------------------------------

/// A parsed config together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: ForkstackConfig,
    /// Path of the config file itself.
    pub path: PathBuf,
    /// Directory containing the config file.
    pub root: PathBuf,
}

impl LoadedConfig {
    /// Absolute marker-file path.
    pub fn marker_path(&self) -> PathBuf {
        self.root.join(&self.config.marker_file)
    }

    /// Absolute env-file path.
    pub fn env_file_path(&self) -> PathBuf {
        self.root.join(&self.config.env_file)
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Parse a config file at `path`.
///
/// Returns `CoreError::Parse` (with path + line context) for malformed YAML
/// and `CoreError::Invalid` for an empty project name.
pub fn load_from_path(path: &Path) -> Result<LoadedConfig, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let config: ForkstackConfig = serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if config.project.as_str().trim().is_empty() {
        return Err(CoreError::Invalid {
            path: path.to_path_buf(),
            message: "`project` must not be empty".to_string(),
        });
    }

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!("loaded config {} (root {})", path.display(), root.display());
    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        root,
    })
}

/// Find the nearest config file at or above `start`.
pub fn find_config_at(start: &Path) -> Result<PathBuf, CoreError> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        if !current.pop() {
            return Err(CoreError::ConfigNotFound {
                start: start.to_path_buf(),
            });
        }
    }
}

/// Find and parse the nearest config file at or above `start`.
pub fn discover_at(start: &Path) -> Result<LoadedConfig, CoreError> {
    let path = find_config_at(start)?;
    load_from_path(&path)
}

/// `discover_at` convenience wrapper starting from the current directory.
pub fn discover() -> Result<LoadedConfig, CoreError> {
    let cwd = std::env::current_dir().map_err(|e| io_err(".", e))?;
    discover_at(&cwd)
}

/// Example config printed by `forks` when none is found.
pub fn example_config() -> &'static str {
    r#"project: myproject
database:
  scheme: libsql
  host_suffix: turso.io
  group: default
storage:
  endpoint: https://fly.storage.tigris.dev
secrets:
  project: myproject
protected: [dev, prod]
"#
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
