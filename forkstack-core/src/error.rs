//! Error types for forkstack-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading configuration and reading or writing local state files.
///
/// Environment resolution and resource naming never return this type; they
/// are total.
#[derive(Debug, Error)]
pub enum CoreError {
    /// I/O failure with the offending path attached.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on config load, with file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No `forkstack.yaml` / `.forkstack.yaml` between `start` and the filesystem root.
    #[error("no forkstack.yaml found in {start} or any parent directory")]
    ConfigNotFound { start: PathBuf },

    /// Config parsed but holds an unusable value.
    #[error("invalid config at {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// `.env.local` could not be parsed as dotenv.
    #[error("failed to parse env file at {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
