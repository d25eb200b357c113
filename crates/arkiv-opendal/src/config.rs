//! Storage configuration types.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{StorageError, StorageResult};

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StorageConfig {
    /// Amazon S3 compatible storage.
    #[cfg(feature = "s3")]
    S3(S3Config),
    /// In-memory storage for tests and local development.
    Memory,
}

impl StorageConfig {
    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "s3")]
            Self::S3(_) => "s3",
            Self::Memory => "memory",
        }
    }

    /// Validates the configuration before a backend is constructed.
    pub fn validate(&self) -> StorageResult<()> {
        match self {
            #[cfg(feature = "s3")]
            Self::S3(s3) => s3.validate(),
            Self::Memory => Ok(()),
        }
    }
}

/// Amazon S3 configuration.
///
/// Covers AWS itself as well as self-hosted S3-compatible stores (MinIO,
/// R2, Garage) via a custom endpoint. The endpoint is given without a
/// scheme; `use_tls` decides between `https` and `http`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket name. The bucket must already exist.
    pub bucket: String,
    /// AWS region.
    pub region: String,
    /// Custom endpoint host (for S3-compatible storage like MinIO, R2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Access key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Secret access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    /// Whether to reach the endpoint over TLS.
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// Forces path-style addressing (`endpoint/bucket/key`), required by
    /// several self-hosted stores. When false, virtual-hosted style
    /// (`bucket.endpoint/key`) is used.
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_use_tls() -> bool {
    true
}

impl S3Config {
    /// Creates a new S3 configuration.
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            use_tls: true,
            force_path_style: false,
        }
    }

    /// Sets the custom endpoint host (for S3-compatible storage).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the access credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Sets whether to reach the endpoint over TLS.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Sets path-style addressing.
    pub fn with_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Returns the full endpoint URL with the scheme applied, if a custom
    /// endpoint is configured.
    pub fn endpoint_url(&self) -> Option<String> {
        let scheme = if self.use_tls { "https" } else { "http" };
        self.endpoint
            .as_deref()
            .map(|host| format!("{scheme}://{host}"))
    }

    /// Validates the configuration and returns any validation errors.
    pub fn validate(&self) -> StorageResult<()> {
        if self.bucket.is_empty() {
            return Err(StorageError::init("bucket name cannot be empty"));
        }

        if self.region.is_empty() {
            return Err(StorageError::init("region cannot be empty"));
        }

        if let Some(url) = self.endpoint_url() {
            let parsed = Url::parse(&url)
                .map_err(|e| StorageError::init(format!("invalid endpoint {url:?}: {e}")))?;

            if parsed.host_str().is_none() {
                return Err(StorageError::init(format!(
                    "endpoint {url:?} is missing a hostname"
                )));
            }
        }

        match (&self.access_key_id, &self.secret_access_key) {
            (Some(_), None) | (None, Some(_)) => Err(StorageError::init(
                "access key id and secret access key must be provided together",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!(StorageConfig::Memory.backend_name(), "memory");
        #[cfg(feature = "s3")]
        assert_eq!(
            StorageConfig::S3(S3Config::new("archive", "us-east-1")).backend_name(),
            "s3"
        );
    }

    #[test]
    fn endpoint_scheme_follows_tls_flag() {
        let secure = S3Config::new("archive", "us-east-1").with_endpoint("minio.local:9000");
        assert_eq!(
            secure.endpoint_url().as_deref(),
            Some("https://minio.local:9000")
        );

        let plain = secure.clone().with_tls(false);
        assert_eq!(
            plain.endpoint_url().as_deref(),
            Some("http://minio.local:9000")
        );
    }

    #[test]
    fn builder_methods() {
        let config = S3Config::new("archive", "eu-west-1")
            .with_endpoint("localhost:9000")
            .with_credentials("access", "secret")
            .with_tls(false)
            .with_path_style(true);

        assert_eq!(config.bucket, "archive");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.access_key_id.as_deref(), Some("access"));
        assert!(config.force_path_style);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_empty_bucket() {
        let config = S3Config::new("", "us-east-1");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_lone_credentials() {
        let mut config = S3Config::new("archive", "us-east-1");
        config.access_key_id = Some("access".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_malformed_endpoint() {
        let config = S3Config::new("archive", "us-east-1").with_endpoint("not a host");
        assert!(config.validate().is_err());
    }
}
