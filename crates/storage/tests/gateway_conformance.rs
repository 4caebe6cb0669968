//! Runs the backend-agnostic gateway conformance suite against every
//! backend shipped in this crate.

use greenloop_storage::conformance::run_conformance_suite;
use greenloop_storage::{JsonFileGateway, MemoryGateway};

#[tokio::test]
async fn memory_gateway_conformance() {
    let report = run_conformance_suite(|| async { MemoryGateway::new() }).await;
    assert_eq!(report.failed, 0, "{report}");
}

#[tokio::test]
async fn file_gateway_conformance() {
    // One directory for the whole run; each test gets its own store file.
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().to_path_buf();
    let counter = std::sync::atomic::AtomicUsize::new(0);

    let report = run_conformance_suite(|| {
        let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let path = base.join(format!("state-{n}.json"));
        async move {
            JsonFileGateway::open(path)
                .await
                .expect("open fresh store file")
        }
    })
    .await;
    assert_eq!(report.failed, 0, "{report}");
}
