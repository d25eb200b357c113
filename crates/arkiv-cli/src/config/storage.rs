//! Storage backend configuration.

use arkiv_opendal::{S3Config, StorageConfig};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

/// Selectable storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// S3-compatible object storage (AWS, MinIO, R2, ...).
    S3,
    /// In-memory storage; contents vanish on restart. Development only.
    Memory,
}

/// Storage configuration.
///
/// All options can be set via environment variables:
/// - `STORAGE_BACKEND` - `s3` (default) or `memory`
/// - `S3_BUCKET_NAME` - bucket name (default: arkiv)
/// - `S3_REGION` - region (default: us-east-1)
/// - `S3_ENDPOINT` - custom endpoint host for S3-compatible stores
/// - `S3_ACCESS_KEY_ID` / `S3_SECRET_ACCESS_KEY` - static credentials
/// - `S3_USE_SSL` - reach the endpoint over TLS (default: true)
/// - `S3_FORCE_PATH_STYLE` - path-style addressing (default: false)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageArgs {
    /// Storage backend to use.
    #[arg(
        long = "storage-backend",
        env = "STORAGE_BACKEND",
        value_enum,
        default_value = "s3"
    )]
    pub backend: Backend,

    /// Bucket name. The bucket must already exist.
    #[arg(long, env = "S3_BUCKET_NAME", default_value = "arkiv")]
    pub bucket: String,

    /// AWS region.
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom endpoint host (for S3-compatible storage like MinIO, R2).
    #[arg(long, env = "S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access key ID.
    #[arg(long, env = "S3_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    /// Secret access key.
    #[arg(long, env = "S3_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Whether to reach the endpoint over TLS.
    #[arg(
        long,
        env = "S3_USE_SSL",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub use_ssl: bool,

    /// Forces path-style addressing, required by several self-hosted
    /// S3-compatible stores.
    #[arg(
        long,
        env = "S3_FORCE_PATH_STYLE",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    pub force_path_style: bool,
}

impl StorageArgs {
    /// Converts the CLI arguments into a gateway storage configuration.
    pub fn to_storage_config(&self) -> StorageConfig {
        match self.backend {
            Backend::Memory => StorageConfig::Memory,
            Backend::S3 => {
                let mut s3 = S3Config::new(&self.bucket, &self.region)
                    .with_tls(self.use_ssl)
                    .with_path_style(self.force_path_style);

                if let Some(ref endpoint) = self.endpoint {
                    s3 = s3.with_endpoint(endpoint);
                }

                if let (Some(access_key_id), Some(secret_access_key)) =
                    (&self.access_key_id, &self.secret_access_key)
                {
                    s3 = s3.with_credentials(access_key_id, secret_access_key);
                }

                StorageConfig::S3(s3)
            }
        }
    }

    /// Returns a masked access key id suitable for startup logs.
    pub fn access_key_masked(&self) -> String {
        match self.access_key_id.as_deref() {
            Some(key) if key.len() > 4 => format!("{}***", &key[..4]),
            Some(_) => "***".to_string(),
            None => "<none>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> StorageArgs {
        StorageArgs {
            backend: Backend::S3,
            bucket: "archive".to_string(),
            region: "us-east-1".to_string(),
            endpoint: Some("localhost:9000".to_string()),
            access_key_id: Some("minioadmin".to_string()),
            secret_access_key: Some("minioadmin".to_string()),
            use_ssl: false,
            force_path_style: true,
        }
    }

    #[test]
    fn s3_args_build_an_s3_config() {
        let config = base_args().to_storage_config();

        match config {
            StorageConfig::S3(s3) => {
                assert_eq!(s3.bucket, "archive");
                assert_eq!(s3.endpoint_url().as_deref(), Some("http://localhost:9000"));
                assert!(s3.force_path_style);
                assert!(s3.validate().is_ok());
            }
            other => panic!("expected S3 config, got {other:?}"),
        }
    }

    #[test]
    fn memory_backend_ignores_s3_settings() {
        let args = StorageArgs {
            backend: Backend::Memory,
            ..base_args()
        };
        assert_eq!(args.to_storage_config(), StorageConfig::Memory);
    }

    #[test]
    fn access_key_is_masked_for_logs() {
        assert_eq!(base_args().access_key_masked(), "mini***");

        let short = StorageArgs {
            access_key_id: Some("abc".to_string()),
            ..base_args()
        };
        assert_eq!(short.access_key_masked(), "***");

        let none = StorageArgs {
            access_key_id: None,
            ..base_args()
        };
        assert_eq!(none.access_key_masked(), "<none>");
    }
}
