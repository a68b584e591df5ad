//! Resource naming.
//!
//! Every derived identifier is a pure function of `(project, env)`:
//!
//! | Resource        | prod                        | other envs                         |
//! |-----------------|-----------------------------|------------------------------------|
//! | database name   | `{project}`                 | `{project}-{env}`                  |
//! | connection URL  | `{scheme}://{project}.{host}` | `{scheme}://{project}-{env}.{host}` |
//! | bucket          | `{project}-bucket-prod`     | `{project}-bucket-{env}`           |
//! | local path      | `{project}.prod.db`         | `{project}.{env}.db`               |
//!
//! Object keys carry no environment: each environment owns its bucket.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::DatabaseConfig;
use crate::types::{EnvironmentId, ProjectName};

/// Variable holding an explicit connection string; wins over the derived URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

const BUCKET_INFIX: &str = "-bucket-";

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Provider-side database name: the bare project for prod, a branch otherwise.
pub fn database_name(project: &ProjectName, env: &EnvironmentId) -> String {
    if env.is_prod() {
        project.0.clone()
    } else {
        format!("{}-{}", project, env)
    }
}

/// Connection URL for `env`; a non-empty `override_url` always wins.
pub fn database_url_with(
    database: &DatabaseConfig,
    project: &ProjectName,
    env: &EnvironmentId,
    override_url: Option<&str>,
) -> String {
    if let Some(url) = override_url.filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    format!(
        "{}://{}.{}",
        database.scheme,
        database_name(project, env),
        database.host_suffix
    )
}

/// Connection URL for `env`, honouring `DATABASE_URL` from the process environment.
pub fn database_url(database: &DatabaseConfig, project: &ProjectName, env: &EnvironmentId) -> String {
    let override_url = std::env::var(DATABASE_URL_VAR).ok();
    database_url_with(database, project, env, override_url.as_deref())
}

/// `{project}-bucket-{env}`.
pub fn bucket_name(project: &ProjectName, env: &EnvironmentId) -> String {
    format!("{}{}{}", project, BUCKET_INFIX, env)
}

/// `{project}.{env}.db`, relative to wherever the caller keeps local data.
pub fn local_path(project: &ProjectName, env: &EnvironmentId) -> PathBuf {
    PathBuf::from(format!("{}.{}.db", project, env))
}

/// `{resource_type}/{filename}`; both segments are used verbatim.
pub fn object_key(resource_type: &str, filename: &str) -> String {
    format!("{resource_type}/{filename}")
}

/// Inverse of [`database_name`].
///
/// `{project}-prod` is not a name [`database_name`] produces, so it yields
/// `None`. Beware a sibling project whose name extends this one with a
/// dash: with project `shop`, the database of project `shop-api` is
/// indistinguishable from environment `api`.
pub fn env_from_database_name(project: &ProjectName, name: &str) -> Option<EnvironmentId> {
    if name == project.as_str() {
        return Some(EnvironmentId::prod());
    }
    name.strip_prefix(project.as_str())
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|env| !env.is_empty())
        .map(EnvironmentId::from)
        .filter(|env| !env.is_prod())
}

/// Inverse of [`bucket_name`].
pub fn env_from_bucket_name(project: &ProjectName, name: &str) -> Option<EnvironmentId> {
    name.strip_prefix(project.as_str())
        .and_then(|rest| rest.strip_prefix(BUCKET_INFIX))
        .filter(|env| !env.is_empty())
        .map(EnvironmentId::from)
}

// ---------------------------------------------------------------------------
// Namer
// ---------------------------------------------------------------------------

/// All derived names for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNames {
    pub environment: EnvironmentId,
    pub database_name: String,
    pub database_url: String,
    pub bucket_name: String,
    pub local_path: PathBuf,
}

/// Naming functions bound to one project and database layout.
#[derive(Debug, Clone)]
pub struct Namer {
    project: ProjectName,
    database: DatabaseConfig,
}

impl Namer {
    pub fn new(project: ProjectName, database: DatabaseConfig) -> Self {
        Self { project, database }
    }

    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    pub fn database_name(&self, env: &EnvironmentId) -> String {
        database_name(&self.project, env)
    }

    pub fn database_url(&self, env: &EnvironmentId) -> String {
        database_url(&self.database, &self.project, env)
    }

    pub fn database_url_with(&self, env: &EnvironmentId, override_url: Option<&str>) -> String {
        database_url_with(&self.database, &self.project, env, override_url)
    }

    pub fn bucket_name(&self, env: &EnvironmentId) -> String {
        bucket_name(&self.project, env)
    }

    pub fn local_path(&self, env: &EnvironmentId) -> PathBuf {
        local_path(&self.project, env)
    }

    pub fn object_key(&self, resource_type: &str, filename: &str) -> String {
        object_key(resource_type, filename)
    }

    pub fn env_from_database_name(&self, name: &str) -> Option<EnvironmentId> {
        env_from_database_name(&self.project, name)
    }

    pub fn env_from_bucket_name(&self, name: &str) -> Option<EnvironmentId> {
        env_from_bucket_name(&self.project, name)
    }

    /// Every derived name for `env`, with `override_url` standing in for `DATABASE_URL`.
    pub fn resources_with(&self, env: &EnvironmentId, override_url: Option<&str>) -> ResourceNames {
        ResourceNames {
            environment: env.clone(),
            database_name: self.database_name(env),
            database_url: self.database_url_with(env, override_url),
            bucket_name: self.bucket_name(env),
            local_path: self.local_path(env),
        }
    }

    /// Every derived name for `env`, honouring `DATABASE_URL`.
    pub fn resources(&self, env: &EnvironmentId) -> ResourceNames {
        let override_url = std::env::var(DATABASE_URL_VAR).ok();
        self.resources_with(env, override_url.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
