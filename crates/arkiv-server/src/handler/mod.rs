//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Everything is served under `/api/v1`:
//!
//! - `GET    /health` — liveness probe
//! - `POST   /users`, `GET|PUT /users/{id}` — placeholder user endpoints
//! - `GET    /files` — archive listing
//! - `POST   /files` — multipart upload
//! - `GET    /files/{key}?download=true` — presigned download link
//! - `DELETE /files/{key}` — idempotent delete
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod files;
mod health;
mod response;
mod users;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{
    FileDownload, FileEntry, FilesResponse, HealthResponse, MessageResponse, UploadedFile, User,
};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns the complete API router with the given state applied.
pub fn routes(state: ServiceState) -> Router {
    let api = Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(files::routes());

    Router::new()
        .nest("/api/v1", api)
        .fallback(fallback)
        .with_state(state)
}

#[cfg(test)]
mod test {
    use arkiv_opendal::{S3Config, StorageConfig};
    use axum_test::TestServer;
    use axum_test::multipart::{MultipartForm, Part};

    use crate::handler::response::{FileDownload, FilesResponse, HealthResponse, UploadedFile};
    use crate::handler::routes;
    use crate::service::ServiceState;

    /// Returns a new [`TestServer`] backed by the in-memory store.
    async fn create_test_server() -> anyhow::Result<TestServer> {
        let state = ServiceState::from_config(StorageConfig::Memory).await?;
        Ok(TestServer::new(routes(state))?)
    }

    /// Returns a new [`TestServer`] backed by an S3 store pointed at a
    /// dummy endpoint. Only good for operations that never leave the
    /// process, like URL signing.
    async fn create_signing_test_server() -> anyhow::Result<TestServer> {
        let config = S3Config::new("archive", "us-east-1")
            .with_endpoint("localhost:9000")
            .with_credentials("minioadmin", "minioadmin")
            .with_tls(false)
            .with_path_style(true);

        let state = ServiceState::from_config(StorageConfig::S3(config)).await?;
        Ok(TestServer::new(routes(state))?)
    }

    fn file_part(payload: Vec<u8>, filename: &str, mime: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(payload).file_name(filename).mime_type(mime),
        )
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();

        let health: HealthResponse = response.json();
        assert_eq!(health.status, "ok");
        assert_eq!(health.service, "arkiv-server");
        Ok(())
    }

    #[tokio::test]
    async fn upload_list_delete_round_trip() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/api/v1/files")
            .multipart(file_part(vec![7u8; 2048], "photo.png", "image/png"))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let uploaded: UploadedFile = response.json();
        assert_eq!(uploaded.name, "photo.png");
        assert_eq!(uploaded.file_size, 2048);
        assert_eq!(uploaded.file_type, "image/png");
        assert!(uploaded.storage_key.ends_with("_photo.png"));
        assert_eq!(uploaded.storage_key, format!("{}_photo.png", uploaded.id));

        let listing: FilesResponse = server.get("/api/v1/files").await.json();
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name, "photo.png");
        assert_eq!(listing.files[0].size, 2048);
        assert_eq!(listing.files[0].storage_key, uploaded.storage_key);

        let delete = server
            .delete(&format!("/api/v1/files/{}", uploaded.storage_key))
            .await;
        delete.assert_status(axum::http::StatusCode::NO_CONTENT);

        // Deleting again still succeeds.
        let again = server
            .delete(&format!("/api/v1/files/{}", uploaded.storage_key))
            .await;
        again.assert_status(axum::http::StatusCode::NO_CONTENT);

        let listing: FilesResponse = server.get("/api/v1/files").await.json();
        assert!(listing.files.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn identical_filenames_get_distinct_keys() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let first: UploadedFile = server
            .post("/api/v1/files")
            .multipart(file_part(vec![1u8; 16], "notes.txt", "text/plain"))
            .await
            .json();
        let second: UploadedFile = server
            .post("/api/v1/files")
            .multipart(file_part(vec![2u8; 16], "notes.txt", "text/plain"))
            .await
            .json();

        assert_ne!(first.storage_key, second.storage_key);

        let listing: FilesResponse = server.get("/api/v1/files").await.json();
        assert_eq!(listing.files.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/api/v1/files")
            .multipart(MultipartForm::new().add_text("note", "no file here"))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn download_issues_presigned_grant() -> anyhow::Result<()> {
        let server = create_signing_test_server().await?;

        let response = server
            .get("/api/v1/files/abc123_report.pdf")
            .add_query_param("download", "true")
            .await;
        response.assert_status_ok();

        let grant: FileDownload = response.json();
        assert!(grant.download);
        assert_eq!(grant.expires_in, 3600);
        assert!(grant.url.contains("abc123_report.pdf"));
        assert!(grant.url.contains("report.pdf"));
        Ok(())
    }

    #[tokio::test]
    async fn inline_download_omits_disposition_override() -> anyhow::Result<()> {
        let server = create_signing_test_server().await?;

        let grant: FileDownload = server.get("/api/v1/files/abc123_photo.png").await.json();
        assert!(!grant.download);
        assert!(!grant.url.contains("response-content-disposition"));
        Ok(())
    }

    #[tokio::test]
    async fn mock_user_endpoints_respond() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        server
            .post("/api/v1/users")
            .await
            .assert_status(axum::http::StatusCode::CREATED);
        server.get("/api/v1/users/1").await.assert_status_ok();
        server.put("/api/v1/users/1").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_return_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        server
            .get("/api/v1/nothing-here")
            .await
            .assert_status_not_found();
        Ok(())
    }
}
