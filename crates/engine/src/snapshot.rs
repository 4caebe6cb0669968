//! Snapshot load and save over the persistence gateway.
//!
//! Each persisted collection lives under its own well-known key (see
//! [`greenloop_storage::keys`]). Loading is lenient: a missing or
//! malformed value falls back to that collection's default with a warning,
//! never a failure, so a damaged store can't brick a session. Writes go
//! through one key at a time, immediately after the mutation that touched
//! the key.
//!
//! Points, badges, vehicles, and equipment requests are deliberately not
//! persisted; they are session-scoped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use greenloop_core::{Building, BuildingStatus, UserProfile, Warning};
use greenloop_storage::{keys, PersistenceGateway};

use crate::store::EntityStore;
use crate::EngineError;

/// Read every snapshot key and assemble a store.
///
/// Gateway I/O failures propagate; malformed values do not. When the
/// `buildings` key has never been written the municipal seed data is used,
/// so compliance features have something to act on out of the box.
pub async fn load(gateway: &dyn PersistenceGateway) -> Result<EntityStore, EngineError> {
    let mut store = EntityStore::new();

    store.history = decode_or_default(keys::APP_HISTORY, gateway.get(keys::APP_HISTORY).await?);
    store.communities = decode_or_default(keys::COMMUNITIES, gateway.get(keys::COMMUNITIES).await?);
    store.community_members = decode_or_default(
        keys::COMMUNITY_MEMBERS,
        gateway.get(keys::COMMUNITY_MEMBERS).await?,
    );
    store.community_messages = decode_or_default(
        keys::COMMUNITY_MESSAGES,
        gateway.get(keys::COMMUNITY_MESSAGES).await?,
    );
    store.pickup_requests = decode_or_default(
        keys::PICKUP_REQUESTS,
        gateway.get(keys::PICKUP_REQUESTS).await?,
    );
    store.bulk_pickup_requests = decode_or_default(
        keys::BULK_PICKUP_REQUESTS,
        gateway.get(keys::BULK_PICKUP_REQUESTS).await?,
    );

    store.buildings = match gateway.get(keys::BUILDINGS).await? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(buildings) => buildings,
            Err(e) => {
                tracing::warn!(
                    key = keys::BUILDINGS,
                    error = %e,
                    "stored snapshot is malformed; using seed data"
                );
                seeded_buildings(OffsetDateTime::now_utc())
            }
        },
        None => seeded_buildings(OffsetDateTime::now_utc()),
    };

    // Plain-string keys: no JSON decoding, absent means default.
    store.profile.name = gateway
        .get(keys::USER_NAME)
        .await?
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UserProfile::DEFAULT_NAME.to_string());
    store.profile.building_id = gateway
        .get(keys::BUILDING_ID)
        .await?
        .filter(|id| !id.is_empty());

    Ok(store)
}

/// Serialize `value` and store it under `key`.
pub(crate) async fn write_key<T>(
    gateway: &dyn PersistenceGateway,
    key: &'static str,
    value: &T,
) -> Result<(), EngineError>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| EngineError::Snapshot { key, source })?;
    gateway.put(key, &text).await?;
    tracing::debug!(key, bytes = text.len(), "snapshot key written");
    Ok(())
}

/// Store a plain (non-JSON) string value under `key`.
pub(crate) async fn write_plain(
    gateway: &dyn PersistenceGateway,
    key: &'static str,
    value: &str,
) -> Result<(), EngineError> {
    gateway.put(key, value).await?;
    tracing::debug!(key, "snapshot key written");
    Ok(())
}

fn decode_or_default<T>(key: &'static str, raw: Option<String>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored snapshot is malformed; using default");
            T::default()
        }
    }
}

/// The municipal register a fresh deployment starts from.
pub fn seeded_buildings(now: OffsetDateTime) -> Vec<Building> {
    vec![
        Building {
            id: "BLD001".to_string(),
            name: "Greenview Apartments".to_string(),
            address: "123 Park Lane".to_string(),
            status: BuildingStatus::Compliant,
            warnings: Vec::new(),
            penalties: Vec::new(),
        },
        Building {
            id: "BLD002".to_string(),
            name: "Sunrise Towers".to_string(),
            address: "456 Main St".to_string(),
            status: BuildingStatus::WarningIssued,
            warnings: vec![Warning {
                id: "W01".to_string(),
                timestamp: now - Duration::days(5),
                reason: "Improper segregation observed on multiple occasions.".to_string(),
            }],
            penalties: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenloop_storage::MemoryGateway;

    #[tokio::test]
    async fn empty_gateway_yields_defaults_plus_seeds() {
        let gateway = MemoryGateway::new();
        let store = load(&gateway).await.unwrap();

        assert!(store.history.is_empty());
        assert_eq!(store.buildings.len(), 2);
        assert_eq!(store.buildings[0].id, "BLD001");
        assert_eq!(store.buildings[1].status, BuildingStatus::WarningIssued);
        assert_eq!(store.profile.name, "Eco-Warrior");
        assert!(store.profile.building_id.is_none());
    }

    #[tokio::test]
    async fn malformed_keys_fall_back_without_failing() {
        let gateway = MemoryGateway::new();
        gateway.seed(keys::APP_HISTORY, "{definitely not json");
        gateway.seed(keys::COMMUNITIES, "42");
        gateway.seed(keys::BUILDINGS, "[{\"broken\":");

        let store = load(&gateway).await.unwrap();
        assert!(store.history.is_empty());
        assert!(store.communities.is_empty());
        assert_eq!(store.buildings.len(), 2);
    }

    #[tokio::test]
    async fn plain_string_keys_round_trip() {
        let gateway = MemoryGateway::new();
        gateway.seed(keys::USER_NAME, "Asha");
        gateway.seed(keys::BUILDING_ID, "BLD002");

        let store = load(&gateway).await.unwrap();
        assert_eq!(store.profile.name, "Asha");
        assert_eq!(store.profile.building_id.as_deref(), Some("BLD002"));
    }

    #[tokio::test]
    async fn empty_building_id_means_unassigned() {
        let gateway = MemoryGateway::new();
        gateway.seed(keys::BUILDING_ID, "");
        let store = load(&gateway).await.unwrap();
        assert!(store.profile.building_id.is_none());
    }
}
