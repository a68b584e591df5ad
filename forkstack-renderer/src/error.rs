//! Error types for forkstack-renderer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Building the tera context failed.
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
