//! Error types for forkstack-backends.

use thiserror::Error;

/// Failure of a provider operation, classified so callers can tell "not
/// there" apart from "could not ask".
#[derive(Debug, Error)]
pub enum BackendError {
    /// The requested secret, database, or bucket does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// The provider rejected the credentials or the caller lacks access.
    #[error("{program}: permission denied: {message}")]
    PermissionDenied { program: String, message: String },

    /// The provider CLI could not be started (not installed, not executable).
    #[error("{program} is unavailable: {source}")]
    Unreachable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The provider CLI ran and exited non-zero for another reason.
    #[error("{program} failed ({status}): {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The provider CLI succeeded but printed something unusable.
    #[error("{program} returned unexpected output: {message}")]
    InvalidOutput { program: String, message: String },

    /// The backend does not implement this operation.
    #[error("operation not supported by {backend}: {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Unreachable { .. })
    }
}
