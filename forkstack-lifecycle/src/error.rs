//! Error types for forkstack-lifecycle.

use std::path::PathBuf;

use thiserror::Error;

use forkstack_backends::BackendError;
use forkstack_core::EnvironmentId;
use forkstack_renderer::RenderError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot delete protected environment '{env}'")]
    Protected { env: EnvironmentId },

    #[error("invalid environment name '{env}': {reason}")]
    InvalidName { env: EnvironmentId, reason: String },

    #[error("environment '{env}' already exists (database {database})")]
    Exists { env: EnvironmentId, database: String },

    #[error("environment '{env}' does not exist")]
    UnknownEnvironment { env: EnvironmentId },

    /// A provider call failed; `step` names what was being attempted.
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: BackendError,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LifecycleError {
    LifecycleError::Io {
        path: path.into(),
        source,
    }
}

/// `map_err` adapter tagging a backend failure with its step.
pub(crate) fn step(step: &'static str) -> impl FnOnce(BackendError) -> LifecycleError {
    move |source| LifecycleError::Step { step, source }
}
