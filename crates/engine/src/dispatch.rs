//! Dispatch simulator: vehicle assignment with timed transitions.
//!
//! Dispatching applies two immediate mutations (vehicle `EnRoute` with the
//! report assigned; report `InProgress`) and, when the report exists and
//! carries a location, schedules two delayed ones: arrival (vehicle jumps to
//! the report's location and turns `Collecting`) and completion (vehicle
//! back to `Idle` with its assignment cleared, report `Resolved`).
//!
//! Scheduled runs are cancellable. Each vehicle has a generation token in
//! the [`DispatchScheduler`]; re-dispatching a vehicle, stealing its report,
//! or manually resolving the report bumps the token and aborts the pending
//! task, so a stale transition can never overwrite a newer assignment. A
//! firing whose token no longer matches is a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use greenloop_core::{GeoPoint, ReportStatus, VehicleStatus};
use greenloop_storage::{keys, PersistenceGateway};

use crate::snapshot;
use crate::store::EntityStore;

/// Delays for the two scheduled transitions.
#[derive(Debug, Clone, Copy)]
pub struct DispatchTiming {
    /// Dispatch to arrival at the report location.
    pub travel: Duration,
    /// Arrival to collection complete.
    pub collection: Duration,
}

impl Default for DispatchTiming {
    fn default() -> Self {
        Self {
            travel: Duration::from_secs(5),
            collection: Duration::from_secs(5),
        }
    }
}

/// What the immediate phase of a dispatch touched.
#[derive(Debug, Clone, Copy)]
pub struct DispatchStart {
    pub vehicle_known: bool,
    pub report_known: bool,
    /// Set when the report exists and has a location; without it nothing
    /// is scheduled and the vehicle stays `EnRoute`.
    pub target: Option<GeoPoint>,
}

impl EntityStore {
    /// Apply the immediate dispatch mutations.
    ///
    /// Each side is independently permissive: an unknown vehicle still
    /// marks the report `InProgress`, and an unknown report leaves the
    /// vehicle `EnRoute` with a dangling assignment.
    pub fn begin_dispatch(&mut self, vehicle_id: &str, report_id: &str) -> DispatchStart {
        let vehicle_known = match self.vehicle_mut(vehicle_id) {
            Some(vehicle) => {
                vehicle.status = VehicleStatus::EnRoute;
                vehicle.assigned_report_id = Some(report_id.to_string());
                true
            }
            None => {
                tracing::warn!(vehicle_id, "dispatch for unknown vehicle; ignoring vehicle side");
                false
            }
        };
        let report_known = self
            .update_report_status(report_id, ReportStatus::InProgress)
            .is_applied();
        let target = self.report(report_id).and_then(|report| report.location);
        DispatchStart {
            vehicle_known,
            report_known,
            target,
        }
    }

    /// The vehicle currently assigned to `report_id`, if any.
    pub fn vehicle_assigned_to(&self, report_id: &str) -> Option<String> {
        self.vehicles
            .iter()
            .find(|v| v.assigned_report_id.as_deref() == Some(report_id))
            .map(|v| v.id.clone())
    }

    /// Return a vehicle to `Idle` and clear its assignment.
    pub(crate) fn idle_vehicle(&mut self, vehicle_id: &str) {
        if let Some(vehicle) = self.vehicle_mut(vehicle_id) {
            vehicle.status = VehicleStatus::Idle;
            vehicle.assigned_report_id = None;
        }
    }

    /// First delayed transition: the vehicle reaches the report.
    pub(crate) fn apply_arrival(&mut self, vehicle_id: &str, location: GeoPoint) {
        if let Some(vehicle) = self.vehicle_mut(vehicle_id) {
            vehicle.current_location = location;
            vehicle.status = VehicleStatus::Collecting;
        }
    }

    /// Second delayed transition: collection done, everything released.
    pub(crate) fn complete_collection(&mut self, vehicle_id: &str, report_id: &str) {
        self.idle_vehicle(vehicle_id);
        self.update_report_status(report_id, ReportStatus::Resolved);
    }
}

// ─── Scheduler ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RunSlot {
    generation: u64,
    task: Option<AbortHandle>,
}

/// Per-vehicle registry of pending dispatch runs.
///
/// A run is keyed by (vehicle id, generation). Bumping the generation
/// invalidates any in-flight run even if its abort races the firing: the
/// task re-checks its token under the store lock before every mutation.
#[derive(Debug, Default)]
pub struct DispatchScheduler {
    runs: StdMutex<HashMap<String, RunSlot>>,
}

impl DispatchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate any pending run for `vehicle_id` and hand out the token
    /// for a new one.
    pub fn begin(&self, vehicle_id: &str) -> u64 {
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        let slot = runs.entry(vehicle_id.to_string()).or_default();
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        slot.generation += 1;
        slot.generation
    }

    /// Invalidate any pending run for `vehicle_id`.
    pub fn cancel(&self, vehicle_id: &str) {
        self.begin(vehicle_id);
        tracing::debug!(vehicle_id, "pending dispatch run cancelled");
    }

    /// Whether `generation` is still the live token for `vehicle_id`.
    ///
    /// Callers must hold the store lock across this check and the mutation
    /// it guards; cancellation paths mutate under the same lock.
    pub fn is_current(&self, vehicle_id: &str, generation: u64) -> bool {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.get(vehicle_id)
            .map(|slot| slot.generation == generation)
            .unwrap_or(false)
    }

    fn attach(&self, vehicle_id: &str, generation: u64, task: AbortHandle) {
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = runs.get_mut(vehicle_id) {
            if slot.generation == generation {
                slot.task = Some(task);
            } else {
                // Superseded before the task was registered.
                task.abort();
            }
        }
    }
}

/// Spawn the delayed transitions for a dispatch run.
///
/// The token was handed out by [`DispatchScheduler::begin`]; the task
/// verifies it under the store lock before each mutation, so a cancelled
/// run dies silently whichever side wins the race.
pub(crate) fn schedule_run(
    store: Arc<Mutex<EntityStore>>,
    gateway: Arc<dyn PersistenceGateway>,
    scheduler: Arc<DispatchScheduler>,
    timing: DispatchTiming,
    vehicle_id: String,
    report_id: String,
    target: GeoPoint,
    generation: u64,
) {
    let registry = Arc::clone(&scheduler);
    let registry_key = vehicle_id.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(timing.travel).await;
        {
            let mut store = store.lock().await;
            if !scheduler.is_current(&vehicle_id, generation) {
                return;
            }
            store.apply_arrival(&vehicle_id, target);
            tracing::debug!(vehicle_id, report_id, "vehicle arrived; collecting");
        }

        tokio::time::sleep(timing.collection).await;
        let history = {
            let mut store = store.lock().await;
            if !scheduler.is_current(&vehicle_id, generation) {
                return;
            }
            store.complete_collection(&vehicle_id, &report_id);
            tracing::debug!(vehicle_id, report_id, "collection complete; vehicle idle");
            store.history.clone()
        };
        // The report flipped to Resolved; write it through. Nothing to
        // return the error to here, so log and move on.
        if let Err(e) = snapshot::write_key(gateway.as_ref(), keys::APP_HISTORY, &history).await {
            tracing::error!(error = %e, "failed to persist history after collection");
        }
    });
    registry.attach(&registry_key, generation, handle.abort_handle());
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenloop_core::NewReport;
    use time::macros::datetime;

    fn store_with_report(location: Option<GeoPoint>) -> (EntityStore, String) {
        let mut store = EntityStore::new();
        let id = store.add_report(
            NewReport {
                description: "Dumped debris".into(),
                location,
                analysis: None,
            },
            datetime!(2024-06-01 10:00 UTC),
        );
        (store, id)
    }

    #[test]
    fn begin_dispatch_applies_both_immediate_mutations() {
        let (mut store, report_id) = store_with_report(Some(GeoPoint::new(1.0, 2.0)));
        let start = store.begin_dispatch("V01", &report_id);

        assert!(start.vehicle_known);
        assert!(start.report_known);
        assert!(start.target.is_some());

        let vehicle = store.vehicle("V01").unwrap();
        assert_eq!(vehicle.status, VehicleStatus::EnRoute);
        assert_eq!(vehicle.assigned_report_id.as_deref(), Some(report_id.as_str()));
        assert_eq!(store.report(&report_id).unwrap().status, ReportStatus::InProgress);
    }

    #[test]
    fn unknown_vehicle_still_moves_the_report() {
        let (mut store, report_id) = store_with_report(None);
        let start = store.begin_dispatch("V99", &report_id);
        assert!(!start.vehicle_known);
        assert!(start.report_known);
        assert_eq!(store.report(&report_id).unwrap().status, ReportStatus::InProgress);
    }

    #[test]
    fn unknown_report_leaves_a_dangling_assignment() {
        let mut store = EntityStore::new();
        let start = store.begin_dispatch("V01", "report-missing");
        assert!(start.vehicle_known);
        assert!(!start.report_known);
        assert!(start.target.is_none());
        let vehicle = store.vehicle("V01").unwrap();
        assert_eq!(vehicle.status, VehicleStatus::EnRoute);
        assert_eq!(vehicle.assigned_report_id.as_deref(), Some("report-missing"));
    }

    #[test]
    fn report_without_location_schedules_nothing() {
        let (mut store, report_id) = store_with_report(None);
        let start = store.begin_dispatch("V01", &report_id);
        assert!(start.target.is_none());
    }

    #[test]
    fn generation_tokens_invalidate_older_runs() {
        let scheduler = DispatchScheduler::new();
        let first = scheduler.begin("V01");
        assert!(scheduler.is_current("V01", first));

        let second = scheduler.begin("V01");
        assert!(!scheduler.is_current("V01", first));
        assert!(scheduler.is_current("V01", second));

        scheduler.cancel("V01");
        assert!(!scheduler.is_current("V01", second));
    }
}
