//! # forkstack-renderer
//!
//! Tera templates for everything forkstack writes or prints about an
//! environment: the `.env.local` credentials file, shell `export` lines and a
//! plain dotenv block.
//!
//! ```rust,no_run
//! use forkstack_renderer::{EnvFileContext, OutputFormat, Renderer};
//! use forkstack_core::ResourceNames;
//!
//! fn exports(names: &ResourceNames) -> Option<String> {
//!     let renderer = Renderer::new().ok()?;
//!     renderer
//!         .render(&EnvFileContext::from_resources(names), OutputFormat::ShellExports)
//!         .ok()
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::EnvFileContext;
pub use engine::{shell_quote, OutputFormat, Renderer};
pub use error::RenderError;
