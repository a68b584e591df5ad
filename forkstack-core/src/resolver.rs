//! Active-environment resolution.
//!
//! Priority, first match wins:
//!
//! 1. `ENV` variable, lowercased and passed through [`normalize_alias`]
//! 2. marker file contents, trimmed
//! 3. `dev`
//!
//! Resolution is total. A marker file that cannot be read or holds only
//! whitespace counts as absent.

use std::path::{Path, PathBuf};

use crate::types::{EnvironmentId, EnvironmentSource};

/// Variable that overrides every other source.
pub const ENV_VAR: &str = "ENV";

/// Map common long names onto the canonical tokens.
///
/// Input is lowercased first; tokens outside the alias table pass through.
pub fn normalize_alias(raw: &str) -> EnvironmentId {
    let lowered = raw.to_lowercase();
    let canonical = match lowered.as_str() {
        "production" | "prod" => EnvironmentId::PROD,
        "development" | "dev" => EnvironmentId::DEV,
        other => other,
    };
    EnvironmentId::from(canonical)
}

/// Resolves the active environment for one project root.
#[derive(Debug, Clone)]
pub struct Resolver {
    marker_path: PathBuf,
}

impl Resolver {
    pub fn new(marker_path: impl Into<PathBuf>) -> Self {
        Self {
            marker_path: marker_path.into(),
        }
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Resolve using the process `ENV` variable.
    pub fn resolve(&self) -> EnvironmentId {
        self.resolve_with_source().0
    }

    /// Like [`resolve`](Self::resolve) but also reports which rule matched.
    pub fn resolve_with_source(&self) -> (EnvironmentId, EnvironmentSource) {
        let override_value = std::env::var(ENV_VAR).ok();
        self.resolve_from(override_value.as_deref())
    }

    /// Resolve with an explicitly supplied override value instead of `ENV`.
    pub fn resolve_with(&self, override_value: Option<&str>) -> EnvironmentId {
        self.resolve_from(override_value).0
    }

    /// Core of the resolution rules; `override_value` stands in for `ENV`.
    pub fn resolve_from(&self, override_value: Option<&str>) -> (EnvironmentId, EnvironmentSource) {
        if let Some(raw) = override_value.filter(|v| !v.is_empty()) {
            return (normalize_alias(raw), EnvironmentSource::Override);
        }

        if let Some(env) = read_marker(&self.marker_path) {
            return (env, EnvironmentSource::Marker);
        }

        (EnvironmentId::dev(), EnvironmentSource::Default)
    }
}

/// Read and trim the marker file; `None` if missing, unreadable, or blank.
pub fn read_marker(path: &Path) -> Option<EnvironmentId> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                tracing::warn!("marker file {} is empty; ignoring", path.display());
                None
            } else {
                Some(EnvironmentId::from(trimmed))
            }
        }
        Err(err) => {
            tracing::warn!("cannot read marker file {}: {}", path.display(), err);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
