//! File catalog projection.
//!
//! The store keeps no metadata catalog; the externally visible file list
//! is projected on demand from the flat key namespace. Each key is
//! decoded back into its id and original name, then augmented with a
//! live size lookup per object.

use arkiv_opendal::{FileKey, FileStore, StorageResult};

/// Tracing target for catalog operations.
const TRACING_TARGET: &str = "arkiv_server::service::catalog";

/// One projected catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Full storage key.
    pub key: String,
    /// Decoded file id.
    pub id: String,
    /// Decoded original filename.
    pub name: String,
    /// Live object size in bytes.
    pub size: u64,
}

/// Projects the complete file listing from the store.
///
/// A failed size lookup for an individual key (e.g. a race with a
/// concurrent deletion) degrades that one entry's size to zero rather
/// than failing the whole listing. Entries come back in whatever order
/// the backend returns its keys.
pub async fn list_entries(store: &FileStore) -> StorageResult<Vec<CatalogEntry>> {
    let keys = store.list().await?;
    let mut entries = Vec::with_capacity(keys.len());

    for key in keys {
        let decoded = FileKey::parse(&key);

        let size = match store.stat(&key).await {
            Ok(meta) => meta.size,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    key = %key,
                    error = %err,
                    "size lookup failed, degrading entry size to zero"
                );
                0
            }
        };

        entries.push(CatalogEntry {
            id: decoded.id().to_string(),
            name: decoded.name().to_string(),
            key,
            size,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use arkiv_opendal::StorageConfig;
    use bytes::Bytes;
    use futures::stream;

    use super::*;

    async fn seeded_store() -> FileStore {
        let store = FileStore::new(StorageConfig::Memory).await.unwrap();

        for (key, size) in [("id1_report.pdf", 128usize), ("id2_report.pdf", 64)] {
            let payload = stream::iter([Ok(Bytes::from(vec![0u8; size]))]);
            store
                .put(key, payload, Some(size as u64), None)
                .await
                .unwrap();
        }

        store
    }

    #[tokio::test]
    async fn projection_decodes_keys_and_sizes() {
        let store = seeded_store().await;
        let mut entries = list_entries(&store).await.unwrap();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "id1");
        assert_eq!(entries[0].name, "report.pdf");
        assert_eq!(entries[0].size, 128);
        assert_eq!(entries[1].id, "id2");
        assert_eq!(entries[1].size, 64);
    }

    #[tokio::test]
    async fn foreign_keys_fall_back_to_whole_key() {
        let store = FileStore::new(StorageConfig::Memory).await.unwrap();
        let payload = stream::iter([Ok(Bytes::from_static(b"data"))]);
        store
            .put("legacy-object.bin", payload, Some(4), None)
            .await
            .unwrap();

        let entries = list_entries(&store).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "legacy-object.bin");
        assert_eq!(entries[0].name, "legacy-object.bin");
    }

    #[tokio::test]
    async fn empty_bucket_projects_empty_listing() {
        let store = FileStore::new(StorageConfig::Memory).await.unwrap();
        assert!(list_entries(&store).await.unwrap().is_empty());
    }
}
