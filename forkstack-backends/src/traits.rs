//! Capability traits, one per external collaborator.
//!
//! The lifecycle crate and the CLI depend only on these traits; whether a
//! capability is met by a subprocess or an SDK is up to the embedder.

use std::collections::BTreeMap;
use std::fmt;

use forkstack_core::EnvironmentId;

use crate::error::BackendError;

/// Connection details for one database branch.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Branchable database provider.
pub trait DatabaseBranches {
    /// Create `name`, optionally seeded from the existing database `from`.
    fn create_branch(&self, name: &str, from: Option<&str>) -> Result<(), BackendError>;

    /// Irreversibly destroy `name`.
    fn destroy_branch(&self, name: &str) -> Result<(), BackendError>;

    /// Names of every database visible to the current credentials.
    fn list_branches(&self) -> Result<Vec<String>, BackendError>;

    /// URL plus a freshly minted auth token for `name`.
    fn connection(&self, name: &str) -> Result<Credentials, BackendError>;
}

/// Bucket-level object storage.
pub trait ObjectStorage {
    fn create_bucket(&self, bucket: &str) -> Result<(), BackendError>;

    /// Copy every object of `from` into `to`.
    fn seed_bucket(&self, from: &str, to: &str) -> Result<(), BackendError>;

    /// Delete `bucket` and everything in it.
    fn delete_bucket(&self, bucket: &str) -> Result<(), BackendError>;

    fn list_buckets(&self) -> Result<Vec<String>, BackendError>;
}

/// Per-environment secrets.
pub trait SecretStore {
    fn get_secret(&self, key: &str, env: &EnvironmentId) -> Result<String, BackendError>;

    fn get_all_secrets(&self, env: &EnvironmentId) -> Result<BTreeMap<String, String>, BackendError>;

    fn set_secret(&self, key: &str, value: &str, env: &EnvironmentId) -> Result<(), BackendError>;

    fn delete_secret(&self, key: &str, env: &EnvironmentId) -> Result<(), BackendError>;
}
