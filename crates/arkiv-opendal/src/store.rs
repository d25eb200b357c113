//! Object storage gateway.
//!
//! [`FileStore`] wraps a single long-lived OpenDAL operator behind the
//! archive's operation set: streaming puts, metadata lookups, full
//! listings, idempotent deletes, and presigned download links. The
//! operator is built once from [`StorageConfig`] at startup and is safe
//! to share across concurrent requests; nothing here holds mutable
//! in-process state.

use std::io;
use std::pin::pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::key::FileKey;

/// Default upload part size: 16 MiB.
///
/// Larger parts reduce per-part overhead, smaller parts reduce retry cost
/// and memory footprint. S3-compatible backends require at least 5 MiB
/// per part except for the last one.
pub const DEFAULT_PART_SIZE: usize = 16 * 1024 * 1024;

/// Default number of concurrently transferred parts per upload.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// Fixed lifetime of presigned download links: one hour.
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(3600);

/// Live metadata for one stored object.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    /// Object size in bytes.
    pub size: u64,
    /// Content type, if the backend recorded one.
    pub content_type: Option<String>,
    /// Last modification time.
    pub last_modified: Option<jiff::Timestamp>,
}

/// A signed, time-limited grant of read access to one object.
///
/// The expiry is encoded in the signature itself; nothing is stored
/// server-side and the grant cannot be revoked early.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PresignedDownload {
    /// The signed URL.
    pub url: String,
    /// Seconds until the signature expires.
    pub expires_in: u64,
    /// Whether the grant forces a browser download under the original
    /// filename instead of inline viewing.
    pub force_download: bool,
}

/// Unified storage gateway over an OpenDAL operator.
#[derive(Clone)]
pub struct FileStore {
    operator: Operator,
    config: StorageConfig,
    part_size: usize,
    upload_concurrency: usize,
}

impl FileStore {
    /// Creates a new store from configuration.
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        config.validate()?;
        let operator = Self::create_operator(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = config.backend_name(),
            "storage backend initialized"
        );

        Ok(Self {
            operator,
            config,
            part_size: DEFAULT_PART_SIZE,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        })
    }

    /// Returns the configuration this store was built from.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Overrides the upload part size.
    ///
    /// A tuning knob, not a correctness parameter; S3-compatible backends
    /// reject parts below 5 MiB (except the final one).
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    /// Overrides the number of concurrently transferred parts.
    pub fn with_upload_concurrency(mut self, concurrency: usize) -> Self {
        self.upload_concurrency = concurrency;
        self
    }

    /// Writes one object from a byte stream, replacing any existing
    /// object under the same key.
    ///
    /// Declared lengths below one part size take a single non-multipart
    /// write; everything else streams through fixed-size parts uploaded
    /// with bounded concurrency and finalized atomically on close, so a
    /// partially transferred object is never visible to readers. On any
    /// failure the upload is aborted and the error re-surfaced with its
    /// operation context.
    ///
    /// Returns the number of bytes written.
    pub async fn put<S>(
        &self,
        key: &str,
        stream: S,
        declared_len: Option<u64>,
        content_type: Option<&str>,
    ) -> StorageResult<u64>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            declared_len = ?declared_len,
            content_type = ?content_type,
            "starting upload"
        );

        let written = match declared_len {
            Some(len) if len < self.part_size as u64 => {
                self.put_single(key, stream, len, content_type).await?
            }
            _ => self.put_multipart(key, stream, content_type).await?,
        };

        tracing::info!(
            target: TRACING_TARGET,
            key = %key,
            size = written,
            "upload complete"
        );

        Ok(written)
    }

    /// Single-write path for payloads known to fit in one part.
    async fn put_single<S>(
        &self,
        key: &str,
        stream: S,
        declared_len: u64,
        content_type: Option<&str>,
    ) -> StorageResult<u64>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        let mut stream = pin!(stream);
        let mut buf = Vec::with_capacity(declared_len as usize);

        while let Some(chunk) = stream.try_next().await.map_err(stream_error)? {
            buf.extend_from_slice(&chunk);
        }

        let written = buf.len() as u64;

        let mut write = self.operator.write_with(key, buf);
        if let Some(ct) = self.effective_content_type(content_type) {
            write = write.content_type(ct);
        }

        write
            .await
            .map_err(|e| StorageError::from_op("put", key, e))?;

        Ok(written)
    }

    /// Multipart path: fixed-size parts, bounded-concurrency transfers,
    /// atomic finalize.
    async fn put_multipart<S>(
        &self,
        key: &str,
        stream: S,
        content_type: Option<&str>,
    ) -> StorageResult<u64>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        let mut writer = self.operator.writer_with(key);
        writer = writer
            .chunk(self.part_size)
            .concurrent(self.upload_concurrency);
        if let Some(ct) = self.effective_content_type(content_type) {
            writer = writer.content_type(ct);
        }

        let mut writer = writer
            .await
            .map_err(|e| StorageError::from_op("put", key, e))?;

        let mut stream = pin!(stream);
        let mut written: u64 = 0;

        let copied = async {
            while let Some(chunk) = stream.try_next().await.map_err(stream_error)? {
                written += chunk.len() as u64;
                writer
                    .write(chunk)
                    .await
                    .map_err(|e| StorageError::from_op("put", key, e))?;
            }
            Ok::<_, StorageError>(())
        }
        .await;

        if let Err(err) = copied {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    target: TRACING_TARGET,
                    key = %key,
                    error = %abort_err,
                    "failed to abort interrupted upload"
                );
            }
            return Err(err);
        }

        writer
            .close()
            .await
            .map_err(|e| StorageError::from_op("put", key, e))?;

        Ok(written)
    }

    /// Gets live metadata for one object.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the key does not exist.
    pub async fn stat(&self, key: &str) -> StorageResult<ObjectMeta> {
        let meta = self
            .operator
            .stat(key)
            .await
            .map_err(|e| StorageError::from_op("stat", key, e))?;

        // Convert chrono DateTime to jiff Timestamp
        let last_modified = meta
            .last_modified()
            .and_then(|dt| jiff::Timestamp::from_second(dt.timestamp()).ok());

        Ok(ObjectMeta {
            size: meta.content_length(),
            content_type: meta.content_type().map(|s| s.to_string()),
            last_modified,
        })
    }

    /// Returns whether an object exists under the given key.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.operator
            .exists(key)
            .await
            .map_err(|e| StorageError::from_op("stat", key, e))
    }

    /// Lists every key in the bucket.
    ///
    /// Backend pagination is drained internally; callers always receive
    /// the complete set. For very large buckets this is a known
    /// scalability ceiling, accepted for an archive of this size.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        let entries: Vec<_> = self
            .operator
            .lister_with("/")
            .recursive(true)
            .await
            .map_err(|e| StorageError::from_op("list", "", e))?
            .try_collect()
            .await
            .map_err(|e| StorageError::from_op("list", "", e))?;

        Ok(entries
            .into_iter()
            .map(|e| e.path().to_string())
            .filter(|path| !path.is_empty() && !path.ends_with('/'))
            .collect())
    }

    /// Deletes one object.
    ///
    /// Idempotent: deleting a key that does not exist succeeds (store
    /// semantics).
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        self.operator
            .delete(key)
            .await
            .map_err(|e| StorageError::from_op("delete", key, e))?;

        tracing::info!(target: TRACING_TARGET, key = %key, "object deleted");
        Ok(())
    }

    /// Issues a signed, time-limited download URL for one object.
    ///
    /// When `force_download` is set, the grant carries a
    /// `Content-Disposition: attachment` override naming the original
    /// file recovered from the key, so browsers save the file under its
    /// uploaded name rather than the opaque storage key. Otherwise the
    /// object is served inline.
    ///
    /// The URL is signed without checking that the key exists. A grant
    /// can therefore outlive its object and surface as a 404 at fetch
    /// time rather than at issuance; callers rely on exactly that
    /// behavior and it is intentional.
    pub async fn presign_download(
        &self,
        key: &str,
        force_download: bool,
    ) -> StorageResult<PresignedDownload> {
        let mut presign = self.operator.presign_read_with(key, DOWNLOAD_URL_TTL);

        if force_download {
            let display_name = FileKey::parse(key).name().to_string();
            let disposition = format!("attachment; filename=\"{display_name}\"");
            presign = presign.override_content_disposition(disposition.as_str());
        }

        let request = presign
            .await
            .map_err(|e| StorageError::from_op("presign", key, e))?;

        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            force_download,
            expires_in = DOWNLOAD_URL_TTL.as_secs(),
            "issued presigned download"
        );

        Ok(PresignedDownload {
            url: request.uri().to_string(),
            expires_in: DOWNLOAD_URL_TTL.as_secs(),
            force_download,
        })
    }

    /// Returns the content type to record with a write, if the backend
    /// can store one at all (kv-based backends cannot).
    fn effective_content_type<'a>(&self, content_type: Option<&'a str>) -> Option<&'a str> {
        let capability = self.operator.info().full_capability();
        content_type.filter(|_| capability.write_with_content_type)
    }

    /// Creates an OpenDAL operator based on configuration.
    fn create_operator(config: &StorageConfig) -> StorageResult<Operator> {
        match config {
            #[cfg(feature = "s3")]
            StorageConfig::S3(s3) => {
                let mut builder = services::S3::default()
                    .bucket(&s3.bucket)
                    .region(&s3.region);

                if let Some(endpoint) = s3.endpoint_url() {
                    builder = builder.endpoint(&endpoint);
                }

                if let Some(ref access_key_id) = s3.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = s3.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                if !s3.force_path_style {
                    builder = builder.enable_virtual_host_style();
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            StorageConfig::Memory => Operator::new(services::Memory::default())
                .map(|op| op.finish())
                .map_err(|e| StorageError::init(e.to_string())),
        }
    }
}

/// Maps an inbound stream failure (client abort, broken pipe) into the
/// storage taxonomy; the upload itself is then aborted by the caller.
fn stream_error(err: io::Error) -> StorageError {
    StorageError::invalid_input(format!("upload stream failed: {err}"))
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("backend", &self.config.backend_name())
            .field("part_size", &self.part_size)
            .field("upload_concurrency", &self.upload_concurrency)
            .finish()
    }
}
