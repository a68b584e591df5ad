//! `aws s3` CLI implementation of [`ObjectStorage`].
//!
//! Works against any S3-compatible endpoint (Tigris, R2, MinIO) through
//! `--endpoint-url`. Credentials come from the inherited environment
//! (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`) or the AWS profile.

use forkstack_core::config::StorageConfig;

use crate::error::BackendError;
use crate::runner::{run_checked, CommandRunner, Invocation, SystemRunner};
use crate::traits::ObjectStorage;

pub const AWS_BIN: &str = "aws";

pub struct S3Cli<R = SystemRunner> {
    runner: R,
    endpoint: Option<String>,
    region: Option<String>,
}

impl S3Cli<SystemRunner> {
    pub fn system(storage: &StorageConfig) -> Self {
        Self::new(SystemRunner, storage)
    }
}

impl<R: CommandRunner> S3Cli<R> {
    pub fn new(runner: R, storage: &StorageConfig) -> Self {
        Self {
            runner,
            endpoint: storage.endpoint.clone(),
            region: storage.region.clone(),
        }
    }

    fn s3<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(AWS_BIN)
            .arg("s3")
            .args(args)
            .opt("--endpoint-url", self.endpoint.as_deref())
            .opt("--region", self.region.as_deref())
    }
}

fn s3_uri(bucket: &str) -> String {
    format!("s3://{bucket}")
}

impl<R: CommandRunner> ObjectStorage for S3Cli<R> {
    fn create_bucket(&self, bucket: &str) -> Result<(), BackendError> {
        let inv = self.s3(["mb".to_string(), s3_uri(bucket)]);
        run_checked(&self.runner, &inv, &format!("bucket {bucket}"))?;
        tracing::info!("created bucket {}", bucket);
        Ok(())
    }

    fn seed_bucket(&self, from: &str, to: &str) -> Result<(), BackendError> {
        let inv = self.s3(["sync".to_string(), s3_uri(from), s3_uri(to)]);
        run_checked(&self.runner, &inv, &format!("bucket {from}"))?;
        tracing::info!("seeded bucket {} from {}", to, from);
        Ok(())
    }

    fn delete_bucket(&self, bucket: &str) -> Result<(), BackendError> {
        let inv = self.s3(["rb".to_string(), s3_uri(bucket), "--force".to_string()]);
        run_checked(&self.runner, &inv, &format!("bucket {bucket}"))?;
        tracing::info!("deleted bucket {}", bucket);
        Ok(())
    }

    fn list_buckets(&self) -> Result<Vec<String>, BackendError> {
        let stdout = run_checked(&self.runner, &self.s3(["ls"]), "bucket list")?;
        // `2024-01-01 12:00:00 bucket-name`
        Ok(stdout
            .lines()
            .filter_map(|line| line.split_whitespace().last())
            .map(str::to_string)
            .collect())
    }
}
