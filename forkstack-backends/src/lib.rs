//! # forkstack-backends
//!
//! Typed clients for the external collaborators (database branches, object
//! storage and secrets) plus the subprocess seam they share.
//!
//! Every operation returns `Result<_, BackendError>`; "not found",
//! "permission denied" and "CLI unavailable" are distinct variants.

pub mod doppler;
pub mod error;
pub mod runner;
pub mod s3;
pub mod secrets;
pub mod traits;
pub mod turso;

pub use doppler::DopplerSecrets;
pub use error::BackendError;
pub use runner::{CommandOutput, CommandRunner, Invocation, ScriptedRunner, SystemRunner};
pub use s3::S3Cli;
pub use secrets::{EnvVarSecrets, WithEnvFallback};
pub use traits::{Credentials, DatabaseBranches, ObjectStorage, SecretStore};
pub use turso::TursoCli;
