//! # forkstack-lifecycle
//!
//! Create, switch, delete and list environments. Each environment is a
//! database branch plus a bucket; activating one rewrites the local env file
//! and marker with atomic writes.
//!
//! Entry point is [`Lifecycle`], built over any [`DatabaseBranches`] and
//! [`ObjectStorage`] implementation.
//!
//! [`DatabaseBranches`]: forkstack_backends::DatabaseBranches
//! [`ObjectStorage`]: forkstack_backends::ObjectStorage

pub mod error;
pub mod pipeline;
pub mod writer;

pub use error::LifecycleError;
pub use pipeline::{
    ActivationReport, CreateOptions, DeleteReport, EnvironmentSummary, Lifecycle,
};
pub use writer::{FileMode, WriteResult};
