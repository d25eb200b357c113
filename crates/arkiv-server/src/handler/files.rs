//! File upload, listing, download, and deletion handlers.

use std::io;

use arkiv_opendal::FileKey;
use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::routing::get;
use axum::Router;
use futures::TryStreamExt;
use serde::Deserialize;

use crate::handler::response::{FileDownload, FileEntry, FilesResponse, UploadedFile};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{self, ServiceState};

/// Tracing target for file operations.
const TRACING_TARGET: &str = "arkiv_server::handler::files";

/// Maximum accepted upload size: 1 GiB.
const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// Fallback content type for uploads that declare none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns the file routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/files", get(list_files).post(upload_file))
        .route("/files/{key}", get(download_file).delete(delete_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Uploads one file from a multipart form.
///
/// The first field carrying a filename is streamed straight into the
/// store under a freshly generated key; the body is never buffered in
/// full. Fields without a filename are skipped.
#[tracing::instrument(skip(state, multipart), target = TRACING_TARGET)]
async fn upload_file(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedFile>)> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid multipart data")
            .with_context(format!("failed to read multipart field: {err}"))
    })? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            tracing::debug!(target: TRACING_TARGET, "skipping field without filename");
            continue;
        };

        let filename = validate_filename(&filename)?;

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        // Per-field length is only known when the client sent one.
        let declared_len = field
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let key = FileKey::generate(&filename).map_err(Error::from)?;
        let storage_key = key.storage_key();

        tracing::debug!(
            target: TRACING_TARGET,
            filename = %filename,
            content_type = %content_type,
            storage_key = %storage_key,
            "processing file upload"
        );

        let stream = field.map_err(io::Error::other);
        let file_size = state
            .store()
            .put(&storage_key, stream, declared_len, Some(&content_type))
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            storage_key = %storage_key,
            size = file_size,
            "file uploaded"
        );

        let now = jiff::Timestamp::now();
        let uploaded = UploadedFile {
            id: key.id().to_string(),
            name: key.name().to_string(),
            storage_key,
            file_size,
            file_type: content_type,
            created_at: now,
            updated_at: now,
        };

        return Ok((StatusCode::CREATED, Json(uploaded)));
    }

    Err(ErrorKind::BadRequest.with_message("No file provided"))
}

/// Lists every archived file with its decoded identity and live size.
#[tracing::instrument(skip(state), target = TRACING_TARGET)]
async fn list_files(State(state): State<ServiceState>) -> Result<Json<FilesResponse>> {
    let entries = service::list_entries(state.store()).await?;

    Ok(Json(FilesResponse {
        files: entries.into_iter().map(FileEntry::from_entry).collect(),
    }))
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    #[serde(default)]
    download: bool,
}

/// Issues a presigned download link for one file.
///
/// With `?download=true` the link forces a browser download under the
/// file's original name; otherwise the object is served inline.
#[tracing::instrument(skip(state), target = TRACING_TARGET)]
async fn download_file(
    State(state): State<ServiceState>,
    Path(key): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<FileDownload>> {
    if key.is_empty() {
        return Err(ErrorKind::BadRequest.with_message("File key required"));
    }

    let grant = state.store().presign_download(&key, query.download).await?;

    Ok(Json(FileDownload {
        url: grant.url,
        expires_in: grant.expires_in,
        download: grant.force_download,
    }))
}

/// Deletes one file.
///
/// Succeeds regardless of prior existence (store semantics).
#[tracing::instrument(skip(state), target = TRACING_TARGET)]
async fn delete_file(
    State(state): State<ServiceState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    if key.is_empty() {
        return Err(ErrorKind::BadRequest.with_message("File key required"));
    }

    state.store().delete(&key).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Strips path components from an uploaded filename and rejects names
/// that sanitize away to nothing.
fn validate_filename(raw: &str) -> Result<String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ErrorKind::BadRequest
            .with_message("Invalid filename")
            .with_context(format!("filename {raw:?} sanitized to nothing")));
    }

    Ok(name.to_string())
}
