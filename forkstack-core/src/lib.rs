//! forkstack core library: environment resolution, resource naming and config.
//!
//! Public API surface:
//! - [`types`]: newtypes ([`EnvironmentId`], [`ProjectName`])
//! - [`error`]: [`CoreError`]
//! - [`config`]: `forkstack.yaml` discovery and parsing
//! - [`resolver`]: which environment is active
//! - [`naming`]: database / bucket / path / key derivation
//! - [`env_file`]: reading cached credentials from `.env.local`

pub mod config;
pub mod env_file;
pub mod error;
pub mod naming;
pub mod resolver;
pub mod types;

pub use config::{ForkstackConfig, LoadedConfig};
pub use error::CoreError;
pub use naming::{Namer, ResourceNames};
pub use resolver::Resolver;
pub use types::{EnvironmentId, EnvironmentSource, ProjectName};

/// Build the resolver and namer for a loaded config.
pub fn bind(loaded: &LoadedConfig) -> (Resolver, Namer) {
    (
        Resolver::new(loaded.marker_path()),
        Namer::new(loaded.config.project.clone(), loaded.config.database.clone()),
    )
}
