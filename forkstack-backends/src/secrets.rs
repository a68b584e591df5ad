//! Environment-variable secrets and the fallback wrapper.

use std::collections::BTreeMap;

use forkstack_core::EnvironmentId;

use crate::error::BackendError;
use crate::traits::SecretStore;

/// Read-only store over environment variables.
///
/// The environment token is ignored: a process only has one set of variables.
#[derive(Debug, Clone, Default)]
pub struct EnvVarSecrets {
    /// `None` reads the live process environment.
    vars: Option<BTreeMap<String, String>>,
}

impl EnvVarSecrets {
    pub fn from_process() -> Self {
        Self { vars: None }
    }

    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars: Some(vars) }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match &self.vars {
            Some(map) => map.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }
}

const ENV_BACKEND: &str = "environment variables";

impl SecretStore for EnvVarSecrets {
    fn get_secret(&self, key: &str, _env: &EnvironmentId) -> Result<String, BackendError> {
        self.lookup(key).ok_or_else(|| BackendError::NotFound {
            what: format!("secret {key}"),
        })
    }

    fn get_all_secrets(&self, _env: &EnvironmentId) -> Result<BTreeMap<String, String>, BackendError> {
        Err(BackendError::Unsupported {
            backend: ENV_BACKEND,
            operation: "list secrets",
        })
    }

    fn set_secret(&self, _key: &str, _value: &str, _env: &EnvironmentId) -> Result<(), BackendError> {
        Err(BackendError::Unsupported {
            backend: ENV_BACKEND,
            operation: "set secret",
        })
    }

    fn delete_secret(&self, _key: &str, _env: &EnvironmentId) -> Result<(), BackendError> {
        Err(BackendError::Unsupported {
            backend: ENV_BACKEND,
            operation: "delete secret",
        })
    }
}

/// Wraps a store so that `get_secret` falls back to an environment variable
/// of the same name when the inner call fails.
///
/// `PermissionDenied` is never masked. If the variable is also absent the
/// inner error is returned unchanged. Every other operation passes straight
/// through.
pub struct WithEnvFallback<S> {
    inner: S,
    fallback: EnvVarSecrets,
}

impl<S: SecretStore> WithEnvFallback<S> {
    pub fn new(inner: S) -> Self {
        Self::with_fallback(inner, EnvVarSecrets::from_process())
    }

    pub fn with_fallback(inner: S, fallback: EnvVarSecrets) -> Self {
        Self { inner, fallback }
    }
}

fn falls_back(err: &BackendError) -> bool {
    err.is_not_found()
        || err.is_unreachable()
        || matches!(err, BackendError::CommandFailed { .. })
}

impl<S: SecretStore> SecretStore for WithEnvFallback<S> {
    fn get_secret(&self, key: &str, env: &EnvironmentId) -> Result<String, BackendError> {
        match self.inner.get_secret(key, env) {
            Err(err) if falls_back(&err) => {
                match self.fallback.get_secret(key, env) {
                    Ok(value) => {
                        tracing::warn!("secret {} served from environment variable ({})", key, err);
                        Ok(value)
                    }
                    Err(_) => Err(err),
                }
            }
            other => other,
        }
    }

    fn get_all_secrets(&self, env: &EnvironmentId) -> Result<BTreeMap<String, String>, BackendError> {
        self.inner.get_all_secrets(env)
    }

    fn set_secret(&self, key: &str, value: &str, env: &EnvironmentId) -> Result<(), BackendError> {
        self.inner.set_secret(key, value, env)
    }

    fn delete_secret(&self, key: &str, env: &EnvironmentId) -> Result<(), BackendError> {
        self.inner.delete_secret(key, env)
    }
}
