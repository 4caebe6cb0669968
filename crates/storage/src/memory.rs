use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::traits::PersistenceGateway;

/// In-memory gateway backed by a plain map.
///
/// Used by tests and by ephemeral sessions that do not need to survive a
/// restart. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, bypassing the trait. Test convenience.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_none_for_unwritten_key() {
        let gateway = MemoryGateway::new();
        assert!(gateway.get("appHistory").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let gateway = MemoryGateway::new();
        gateway.put("userName", "Eco-Warrior").await.unwrap();
        assert_eq!(
            gateway.get("userName").await.unwrap().as_deref(),
            Some("Eco-Warrior")
        );
    }

    #[tokio::test]
    async fn seed_is_visible_through_the_trait() {
        let gateway = MemoryGateway::new();
        gateway.seed("buildingId", "BLD001");
        assert_eq!(
            gateway.get("buildingId").await.unwrap().as_deref(),
            Some("BLD001")
        );
    }
}
