use std::future::Future;

use super::TestResult;
use crate::{keys, PersistenceGateway};

pub(super) async fn run_key_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "keys",
        "writes_to_one_key_leave_others_untouched",
        writes_to_one_key_leave_others_untouched(factory).await,
    ));
    results.push(TestResult::from_result(
        "keys",
        "every_snapshot_key_is_usable",
        every_snapshot_key_is_usable(factory).await,
    ));
    results.push(TestResult::from_result(
        "keys",
        "similar_key_names_do_not_collide",
        similar_key_names_do_not_collide(factory).await,
    ));

    results
}

// ── Test implementations ──────────────────────────────────────────────

/// The session persists collections independently; a write to one key must
/// never disturb a sibling.
async fn writes_to_one_key_leave_others_untouched<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    g.put(keys::COMMUNITIES, "[{\"id\":\"comm-1\"}]")
        .await
        .map_err(|e| e.to_string())?;
    g.put(keys::BUILDINGS, "[]")
        .await
        .map_err(|e| e.to_string())?;

    let communities = g
        .get(keys::COMMUNITIES)
        .await
        .map_err(|e| e.to_string())?;
    if communities.as_deref() != Some("[{\"id\":\"comm-1\"}]") {
        return Err(format!(
            "communities were disturbed by a buildings write: {communities:?}"
        ));
    }
    let history = g.get(keys::APP_HISTORY).await.map_err(|e| e.to_string())?;
    if history.is_some() {
        return Err("unwritten sibling key became non-absent".to_string());
    }
    Ok(())
}

/// All well-known snapshot keys must store and read back.
async fn every_snapshot_key_is_usable<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    for (i, key) in keys::ALL.iter().enumerate() {
        let value = format!("value-{i}");
        g.put(key, &value).await.map_err(|e| e.to_string())?;
    }
    for (i, key) in keys::ALL.iter().enumerate() {
        let expected = format!("value-{i}");
        let got = g.get(key).await.map_err(|e| e.to_string())?;
        if got.as_deref() != Some(expected.as_str()) {
            return Err(format!("key {key}: expected {expected:?}, got {got:?}"));
        }
    }
    Ok(())
}

/// `buildingId` and `buildings` are distinct keys; prefix matching would
/// corrupt the store.
async fn similar_key_names_do_not_collide<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    g.put(keys::BUILDING_ID, "BLD001")
        .await
        .map_err(|e| e.to_string())?;
    g.put(keys::BUILDINGS, "[]")
        .await
        .map_err(|e| e.to_string())?;

    let building_id = g.get(keys::BUILDING_ID).await.map_err(|e| e.to_string())?;
    let buildings = g.get(keys::BUILDINGS).await.map_err(|e| e.to_string())?;
    if building_id.as_deref() != Some("BLD001") {
        return Err(format!("buildingId corrupted: {building_id:?}"));
    }
    if buildings.as_deref() != Some("[]") {
        return Err(format!("buildings corrupted: {buildings:?}"));
    }
    Ok(())
}
