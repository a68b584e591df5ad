//! `doppler` CLI implementation of [`SecretStore`].
//!
//! The environment token selects the Doppler config (`--config <env>`).
//! Secret values are passed on stdin so they never appear in argv or logs.

use std::collections::BTreeMap;

use forkstack_core::EnvironmentId;

use crate::error::BackendError;
use crate::runner::{run_checked, CommandRunner, Invocation, SystemRunner};
use crate::traits::SecretStore;

pub const DOPPLER_BIN: &str = "doppler";

pub struct DopplerSecrets<R = SystemRunner> {
    runner: R,
    project: Option<String>,
}

impl DopplerSecrets<SystemRunner> {
    pub fn system(project: Option<String>) -> Self {
        Self::new(SystemRunner, project)
    }
}

impl<R: CommandRunner> DopplerSecrets<R> {
    pub fn new(runner: R, project: Option<String>) -> Self {
        Self { runner, project }
    }

    fn secrets<I, S>(&self, args: I, env: &EnvironmentId) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(DOPPLER_BIN)
            .arg("secrets")
            .args(args)
            .arg("--config")
            .arg(env.as_str())
            .opt("--project", self.project.as_deref())
    }
}

impl<R: CommandRunner> SecretStore for DopplerSecrets<R> {
    fn get_secret(&self, key: &str, env: &EnvironmentId) -> Result<String, BackendError> {
        let inv = self.secrets(["get", key, "--plain"], env);
        let value = run_checked(&self.runner, &inv, &format!("secret {key}"))?;
        Ok(value.strip_suffix('\n').unwrap_or(&value).to_string())
    }

    fn get_all_secrets(&self, env: &EnvironmentId) -> Result<BTreeMap<String, String>, BackendError> {
        let inv = self.secrets(["download", "--no-file", "--format", "json"], env);
        let stdout = run_checked(&self.runner, &inv, &format!("config {env}"))?;
        serde_json::from_str(&stdout).map_err(|e| BackendError::InvalidOutput {
            program: DOPPLER_BIN.to_string(),
            message: format!("secrets download is not a JSON object of strings: {e}"),
        })
    }

    fn set_secret(&self, key: &str, value: &str, env: &EnvironmentId) -> Result<(), BackendError> {
        let inv = self.secrets(["set", key, "--silent"], env).stdin(value);
        run_checked(&self.runner, &inv, &format!("config {env}"))?;
        tracing::info!("set secret {} in {}", key, env);
        Ok(())
    }

    fn delete_secret(&self, key: &str, env: &EnvironmentId) -> Result<(), BackendError> {
        let inv = self.secrets(["delete", key, "--yes", "--silent"], env);
        run_checked(&self.runner, &inv, &format!("secret {key}"))?;
        tracing::info!("deleted secret {} from {}", key, env);
        Ok(())
    }
}
