//! Environment lifecycle: create, switch, delete, list.
//!
//! Provider calls go through [`DatabaseBranches`] and [`ObjectStorage`];
//! local state is the marker file and the env file under the project root.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use forkstack_backends::{Credentials, DatabaseBranches, ObjectStorage};
use forkstack_core::resolver::read_marker;
use forkstack_core::{EnvironmentId, LoadedConfig, Namer, Resolver, ResourceNames};
use forkstack_renderer::{EnvFileContext, OutputFormat, Renderer};

use crate::error::{step, LifecycleError};
use crate::writer::{atomic_write, remove_if_exists, FileMode, WriteResult};

// ---------------------------------------------------------------------------
// Options / reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Seed the new database and bucket from this environment.
    pub from: Option<EnvironmentId>,
    pub dry_run: bool,
}

/// Result of `create` or `switch`.
#[derive(Debug, Clone)]
pub struct ActivationReport {
    pub environment: EnvironmentId,
    pub resources: ResourceNames,
    pub writes: Vec<WriteResult>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    pub database_deleted: bool,
    pub bucket_deleted: bool,
    /// Failed cleanup steps; delete carries on past them.
    pub warnings: Vec<String>,
    pub marker_cleared: bool,
}

/// One row of `forks list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSummary {
    pub name: EnvironmentId,
    pub has_database: bool,
    pub has_bucket: bool,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

pub struct Lifecycle<'a> {
    config: &'a LoadedConfig,
    namer: Namer,
    database: &'a dyn DatabaseBranches,
    storage: &'a dyn ObjectStorage,
    renderer: Renderer,
}

impl<'a> Lifecycle<'a> {
    pub fn new(
        config: &'a LoadedConfig,
        database: &'a dyn DatabaseBranches,
        storage: &'a dyn ObjectStorage,
    ) -> Result<Self, LifecycleError> {
        let (_, namer) = forkstack_core::bind(config);
        Ok(Self {
            config,
            namer,
            database,
            storage,
            renderer: Renderer::new()?,
        })
    }

    fn marker_path(&self) -> PathBuf {
        self.config.marker_path()
    }

    /// Provision a database branch and bucket for `env`, then activate it.
    pub fn create(
        &self,
        env: &EnvironmentId,
        options: &CreateOptions,
    ) -> Result<ActivationReport, LifecycleError> {
        env.validate_for_provisioning()
            .map_err(|reason| LifecycleError::InvalidName {
                env: env.clone(),
                reason,
            })?;

        let database = self.namer.database_name(env);
        let existing = self
            .database
            .list_branches()
            .map_err(step("list databases"))?;
        if existing.contains(&database) {
            return Err(LifecycleError::Exists {
                env: env.clone(),
                database,
            });
        }

        let resources = self.namer.resources_with(env, None);
        if options.dry_run {
            tracing::info!("[dry-run] would create database {}", database);
            tracing::info!("[dry-run] would create bucket {}", resources.bucket_name);
            let ctx = EnvFileContext::from_resources(&resources);
            return self.activate(env, resources, ctx, true);
        }

        let parent = options.from.as_ref().map(|from| self.namer.database_name(from));
        tracing::info!("[{}] creating database {}", env, database);
        self.database
            .create_branch(&database, parent.as_deref())
            .map_err(step("create database"))?;

        tracing::info!("[{}] fetching credentials", env);
        let credentials = self
            .database
            .connection(&database)
            .map_err(step("fetch database credentials"))?;

        tracing::info!("[{}] creating bucket {}", env, resources.bucket_name);
        self.storage
            .create_bucket(&resources.bucket_name)
            .map_err(step("create bucket"))?;
        if let Some(from) = &options.from {
            let source = self.namer.bucket_name(from);
            tracing::info!("[{}] seeding bucket from {}", env, source);
            self.storage
                .seed_bucket(&source, &resources.bucket_name)
                .map_err(step("seed bucket"))?;
        }

        let ctx = with_credentials(&resources, credentials);
        self.activate(env, resources, ctx, false)
    }

    /// Point the working copy at an existing environment.
    pub fn switch(&self, env: &EnvironmentId, dry_run: bool) -> Result<ActivationReport, LifecycleError> {
        let database = self.namer.database_name(env);
        let resources = self.namer.resources_with(env, None);

        if dry_run {
            // Minting a token is not read-only; check existence via the listing.
            let existing = self
                .database
                .list_branches()
                .map_err(step("list databases"))?;
            if !existing.contains(&database) {
                return Err(LifecycleError::UnknownEnvironment { env: env.clone() });
            }
            let ctx = EnvFileContext::from_resources(&resources);
            return self.activate(env, resources, ctx, true);
        }

        let credentials = self.database.connection(&database).map_err(|e| {
            if e.is_not_found() {
                LifecycleError::UnknownEnvironment { env: env.clone() }
            } else {
                LifecycleError::Step {
                    step: "fetch database credentials",
                    source: e,
                }
            }
        })?;
        let ctx = with_credentials(&resources, credentials);
        self.activate(env, resources, ctx, false)
    }

    /// Tear down `env`'s database and bucket.
    ///
    /// Provider failures are collected as warnings; the marker is cleared
    /// only when it names `env`.
    pub fn delete(&self, env: &EnvironmentId) -> Result<DeleteReport, LifecycleError> {
        if self.config.config.is_protected(env) {
            return Err(LifecycleError::Protected { env: env.clone() });
        }

        let mut report = DeleteReport::default();

        let database = self.namer.database_name(env);
        match self.database.destroy_branch(&database) {
            Ok(()) => report.database_deleted = true,
            Err(e) => {
                tracing::warn!("failed to delete database {}: {}", database, e);
                report.warnings.push(format!("database {database}: {e}"));
            }
        }

        let bucket = self.namer.bucket_name(env);
        match self.storage.delete_bucket(&bucket) {
            Ok(()) => report.bucket_deleted = true,
            Err(e) => {
                tracing::warn!("failed to delete bucket {}: {}", bucket, e);
                report.warnings.push(format!("bucket {bucket}: {e}"));
            }
        }

        let marker = self.marker_path();
        if read_marker(&marker).as_ref() == Some(env) {
            report.marker_cleared = remove_if_exists(&marker)?;
        }
        Ok(report)
    }

    /// Every environment with a database branch or a bucket, sorted by name.
    pub fn list(&self) -> Result<Vec<EnvironmentSummary>, LifecycleError> {
        let branches = self
            .database
            .list_branches()
            .map_err(step("list databases"))?;
        let buckets = self.storage.list_buckets().map_err(step("list buckets"))?;

        let mut found: BTreeMap<EnvironmentId, (bool, bool)> = BTreeMap::new();
        for env in branches
            .iter()
            .filter_map(|name| self.namer.env_from_database_name(name))
        {
            found.entry(env).or_default().0 = true;
        }
        for env in buckets
            .iter()
            .filter_map(|name| self.namer.env_from_bucket_name(name))
        {
            found.entry(env).or_default().1 = true;
        }

        let active = Resolver::new(self.marker_path()).resolve_with(None);
        Ok(found
            .into_iter()
            .map(|(name, (has_database, has_bucket))| EnvironmentSummary {
                active: name == active,
                name,
                has_database,
                has_bucket,
            })
            .collect())
    }

    fn activate(
        &self,
        env: &EnvironmentId,
        resources: ResourceNames,
        ctx: EnvFileContext,
        dry_run: bool,
    ) -> Result<ActivationReport, LifecycleError> {
        let env_file = self.renderer.render(&ctx, OutputFormat::EnvLocal)?;
        let writes = vec![
            atomic_write(&self.config.env_file_path(), &env_file, FileMode::Private, dry_run)?,
            atomic_write(&self.marker_path(), env.as_str(), FileMode::Shared, dry_run)?,
        ];
        Ok(ActivationReport {
            environment: env.clone(),
            resources,
            writes,
            dry_run,
        })
    }
}

fn with_credentials(resources: &ResourceNames, credentials: Credentials) -> EnvFileContext {
    EnvFileContext::from_resources(resources).with_credentials(credentials.url, credentials.token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
