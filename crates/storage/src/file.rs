use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::traits::PersistenceGateway;

/// File-backed gateway: the whole store is one JSON object on disk, keys
/// mapping to their serialized string values.
///
/// Every `put` rewrites the document through a temp-file rename, so a crash
/// mid-write leaves the previous document intact. A malformed document at
/// open time is logged and replaced with an empty store on the next write;
/// sessions must keep working even when the on-disk state is damaged.
#[derive(Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileGateway {
    /// Open (or lazily create) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "store file is malformed; starting from an empty store"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Backend(format!("store document encoding: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileGateway {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_on_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = JsonFileGateway::open(dir.path().join("state.json"))
            .await
            .unwrap();
        assert!(gateway.get("appHistory").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let gateway = JsonFileGateway::open(&path).await.unwrap();
        gateway.put("userName", "Asha").await.unwrap();
        gateway.put("buildingId", "BLD002").await.unwrap();
        drop(gateway);

        let reopened = JsonFileGateway::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("userName").await.unwrap().as_deref(),
            Some("Asha")
        );
        assert_eq!(
            reopened.get("buildingId").await.unwrap().as_deref(),
            Some("BLD002")
        );
    }

    #[tokio::test]
    async fn malformed_document_is_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let gateway = JsonFileGateway::open(&path).await.unwrap();
        assert!(gateway.get("userName").await.unwrap().is_none());

        gateway.put("userName", "Asha").await.unwrap();
        let reopened = JsonFileGateway::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("userName").await.unwrap().as_deref(),
            Some("Asha")
        );
    }

    #[tokio::test]
    async fn no_partial_document_is_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let gateway = JsonFileGateway::open(&path).await.unwrap();
        gateway.put("communities", "[]").await.unwrap();

        // The temp file used for the atomic rename must not linger.
        assert!(!path.with_extension("tmp").exists());
        assert!(path.exists());
    }
}
