//! Rendering payload shared by every output format.

use serde::Serialize;

use forkstack_core::ResourceNames;

use crate::error::RenderError;

/// Flat view of one environment's connection details.
///
/// `database_auth_token` is only known after talking to the database
/// provider; formats derived purely from naming leave it `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvFileContext {
    pub environment: String,
    pub database_url: String,
    pub database_auth_token: Option<String>,
    pub bucket_name: String,
    pub local_db_path: String,
}

impl EnvFileContext {
    pub fn from_resources(names: &ResourceNames) -> Self {
        Self {
            environment: names.environment.to_string(),
            database_url: names.database_url.clone(),
            database_auth_token: None,
            bucket_name: names.bucket_name.clone(),
            local_db_path: names.local_path.display().to_string(),
        }
    }

    /// Replace the derived URL with the provider's and attach its token.
    pub fn with_credentials(mut self, url: impl Into<String>, token: impl Into<String>) -> Self {
        self.database_url = url.into();
        self.database_auth_token = Some(token.into());
        self
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        let value = serde_json::to_value(self)?;
        Ok(tera::Context::from_value(value)?)
    }
}
