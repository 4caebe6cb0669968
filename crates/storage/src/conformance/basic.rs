use std::future::Future;

use super::TestResult;
use crate::PersistenceGateway;

pub(super) async fn run_basic_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "roundtrip",
        "put_then_get_returns_same_value",
        put_then_get_returns_same_value(factory).await,
    ));
    results.push(TestResult::from_result(
        "roundtrip",
        "overwrite_replaces_previous_value",
        overwrite_replaces_previous_value(factory).await,
    ));
    results.push(TestResult::from_result(
        "roundtrip",
        "empty_string_value_is_preserved",
        empty_string_value_is_preserved(factory).await,
    ));
    results.push(TestResult::from_result(
        "roundtrip",
        "unicode_value_is_preserved",
        unicode_value_is_preserved(factory).await,
    ));
    results.push(TestResult::from_result(
        "roundtrip",
        "large_json_document_is_preserved",
        large_json_document_is_preserved(factory).await,
    ));
    results.push(TestResult::from_result(
        "absence",
        "unwritten_key_reads_as_none",
        unwritten_key_reads_as_none(factory).await,
    ));
    results.push(TestResult::from_result(
        "absence",
        "get_does_not_create_the_key",
        get_does_not_create_the_key(factory).await,
    ));

    results
}

// ── Test implementations ──────────────────────────────────────────────

/// A stored value must come back exactly as written.
async fn put_then_get_returns_same_value<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    g.put("userName", "Asha").await.map_err(|e| e.to_string())?;
    let got = g.get("userName").await.map_err(|e| e.to_string())?;
    if got.as_deref() != Some("Asha") {
        return Err(format!("expected Some(\"Asha\"), got {got:?}"));
    }
    Ok(())
}

/// The second put wins; no trace of the first value remains.
async fn overwrite_replaces_previous_value<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    g.put("buildingId", "BLD001")
        .await
        .map_err(|e| e.to_string())?;
    g.put("buildingId", "BLD002")
        .await
        .map_err(|e| e.to_string())?;
    let got = g.get("buildingId").await.map_err(|e| e.to_string())?;
    if got.as_deref() != Some("BLD002") {
        return Err(format!("expected Some(\"BLD002\"), got {got:?}"));
    }
    Ok(())
}

/// An empty string is a value, distinct from absence.
async fn empty_string_value_is_preserved<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    g.put("buildingId", "").await.map_err(|e| e.to_string())?;
    let got = g.get("buildingId").await.map_err(|e| e.to_string())?;
    if got.as_deref() != Some("") {
        return Err(format!("expected Some(\"\"), got {got:?}"));
    }
    Ok(())
}

/// Multi-byte content must not be mangled by the backend.
async fn unicode_value_is_preserved<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    let value = "कचरा प्रबंधन 🌱 «déchets»";
    g.put("userName", value).await.map_err(|e| e.to_string())?;
    let got = g.get("userName").await.map_err(|e| e.to_string())?;
    if got.as_deref() != Some(value) {
        return Err(format!("expected {value:?}, got {got:?}"));
    }
    Ok(())
}

/// Snapshot values are whole serialized collections; a realistic document
/// must survive untouched.
async fn large_json_document_is_preserved<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    let items: Vec<serde_json::Value> = (0..500)
        .map(|i| {
            serde_json::json!({
                "id": format!("report-{i}"),
                "type": "report",
                "timestamp": "2024-03-01T12:00:00Z",
                "data": {"description": format!("bin overflow #{i}"), "status": "Pending"},
            })
        })
        .collect();
    let document = serde_json::to_string(&items).map_err(|e| e.to_string())?;

    g.put("appHistory", &document)
        .await
        .map_err(|e| e.to_string())?;
    let got = g.get("appHistory").await.map_err(|e| e.to_string())?;
    if got.as_deref() != Some(document.as_str()) {
        return Err("large document did not round-trip byte-for-byte".to_string());
    }
    Ok(())
}

/// A key never written reads as None.
async fn unwritten_key_reads_as_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    let got = g.get("communities").await.map_err(|e| e.to_string())?;
    if got.is_some() {
        return Err(format!("expected None, got {got:?}"));
    }
    Ok(())
}

/// Reading must be side-effect free: a second read still sees None.
async fn get_does_not_create_the_key<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let g = factory().await;
    let _ = g.get("pickupRequests").await.map_err(|e| e.to_string())?;
    let got = g.get("pickupRequests").await.map_err(|e| e.to_string())?;
    if got.is_some() {
        return Err("get created the key as a side effect".to_string());
    }
    Ok(())
}
