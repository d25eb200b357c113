//! Response types for the HTTP API.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::service::CatalogEntry;

/// One file in the archive listing.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct FileEntry {
    /// Generated file id decoded from the storage key.
    pub id: String,
    /// Original filename decoded from the storage key.
    pub name: String,
    /// Full storage key.
    pub storage_key: String,
    /// Live object size in bytes; zero when the size lookup raced a
    /// concurrent deletion.
    pub size: u64,
}

impl FileEntry {
    /// Creates a response entry from a catalog projection entry.
    pub fn from_entry(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            storage_key: entry.key,
            size: entry.size,
        }
    }
}

/// The archive listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilesResponse {
    /// All files currently in the bucket, in backend order.
    pub files: Vec<FileEntry>,
}

/// Response for a completed upload.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Generated file id.
    pub id: String,
    /// Original filename.
    pub name: String,
    /// Full storage key the object was written under.
    pub storage_key: String,
    /// Bytes written.
    pub file_size: u64,
    /// Content type the object was stored with.
    pub file_type: String,
    /// Upload timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp (same as `created_at` for a fresh upload).
    pub updated_at: Timestamp,
}

/// Response for a presigned download request.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileDownload {
    /// The signed URL.
    pub url: String,
    /// Seconds until the signature expires.
    pub expires_in: u64,
    /// Whether the grant forces a browser download.
    pub download: bool,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Human-readable status.
    pub status: String,
    /// Unix timestamp of the check.
    pub timestamp: i64,
    /// Service name.
    pub service: String,
}

/// Mock user representation served by the placeholder user endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Simple confirmation message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_keeps_catalog_fields() {
        let entry = CatalogEntry {
            key: "abc123_report.pdf".to_string(),
            id: "abc123".to_string(),
            name: "report.pdf".to_string(),
            size: 42,
        };

        let response = FileEntry::from_entry(entry);
        assert_eq!(response.id, "abc123");
        assert_eq!(response.name, "report.pdf");
        assert_eq!(response.storage_key, "abc123_report.pdf");
        assert_eq!(response.size, 42);
    }

    #[test]
    fn listing_serializes_with_snake_case_fields() {
        let response = FilesResponse {
            files: vec![FileEntry {
                id: "a".into(),
                name: "n.txt".into(),
                storage_key: "a_n.txt".into(),
                size: 7,
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["files"][0]["storage_key"], "a_n.txt");
        assert_eq!(json["files"][0]["size"], 7);
    }
}
