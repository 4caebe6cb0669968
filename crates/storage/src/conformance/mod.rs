//! Conformance test suite for `PersistenceGateway` implementations.
//!
//! A backend-agnostic suite any gateway can run to verify the contract the
//! session relies on:
//!
//! - **Round-trip fidelity**: values come back byte-for-byte, including
//!   empty strings, unicode, and large JSON documents
//! - **Absence semantics**: unwritten keys read as `None` and reads never
//!   create keys
//! - **Key independence**: writes to one snapshot key never disturb another
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function
//! that creates a fresh, empty gateway for each test:
//!
//! ```ignore
//! use greenloop_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn file_gateway_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         open_fresh_file_gateway().await
//!     }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod basic;
mod keys;

use std::fmt;
use std::future::Future;

use crate::PersistenceGateway;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "roundtrip", "keys").
    pub category: String,
    /// Test name (e.g. "overwrite_replaces_previous_value").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                category: category.to_string(),
                name: name.to_string(),
                passed: true,
                message: None,
            },
            Err(msg) => Self {
                category: category.to_string(),
                name: name.to_string(),
                passed: false,
                message: Some(msg),
            },
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a gateway backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// gateway, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: PersistenceGateway,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(basic::run_basic_tests(&factory).await);
    results.extend(keys::run_key_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}
