//! Domain types shared across forkstack crates.
//!
//! Environment tokens and project names are newtypes over `String`; neither is
//! validated on construction. Provisioning-time checks live in
//! [`EnvironmentId::validate_for_provisioning`].

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Environment token such as `dev`, `prod`, or a per-developer `alice`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(pub String);

impl EnvironmentId {
    /// The production environment token.
    pub const PROD: &'static str = "prod";
    /// The default environment token.
    pub const DEV: &'static str = "dev";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_prod(&self) -> bool {
        self.0 == Self::PROD
    }

    /// Default environment used when nothing else selects one.
    pub fn dev() -> Self {
        Self(Self::DEV.to_owned())
    }

    pub fn prod() -> Self {
        Self(Self::PROD.to_owned())
    }

    /// Check that the token can be embedded in a database and bucket name.
    ///
    /// Accepts ASCII lowercase letters, digits and `-`; rejects empty tokens
    /// and leading or trailing hyphens.
    pub fn validate_for_provisioning(&self) -> Result<(), String> {
        let s = self.0.as_str();
        if s.is_empty() {
            return Err("environment name is empty".to_string());
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(format!(
                "environment name '{s}' contains '{bad}'; use lowercase letters, digits and '-'"
            ));
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(format!(
                "environment name '{s}' must not start or end with '-'"
            ));
        }
        Ok(())
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EnvironmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EnvironmentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl PartialEq<str> for EnvironmentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EnvironmentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Project name used as the stem of every derived resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(pub String);

impl ProjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Resolution source
// ---------------------------------------------------------------------------

/// Which resolution rule produced the active environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentSource {
    /// The `ENV` override variable.
    Override,
    /// The marker file written by `forks switch`.
    Marker,
    /// Nothing selected an environment; fell back to `dev`.
    Default,
}

impl fmt::Display for EnvironmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentSource::Override => write!(f, "override"),
            EnvironmentSource::Marker => write!(f, "marker"),
            EnvironmentSource::Default => write!(f, "default"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
