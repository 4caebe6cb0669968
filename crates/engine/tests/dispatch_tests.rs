//! Dispatch timing behavior under paused tokio time.
//!
//! The runtime auto-advances the clock whenever every task is parked, so
//! the 5-second delays elapse instantly while preserving their ordering.

use std::sync::Arc;
use std::time::Duration;

use greenloop_core::{GeoPoint, Identity, NewReport, ReportStatus, VehicleStatus};
use greenloop_engine::{Session, SessionConfig, StaticModeration};
use greenloop_storage::MemoryGateway;

async fn start() -> Session {
    Session::start(
        Arc::new(MemoryGateway::new()),
        Arc::new(StaticModeration::AllowAll),
        Identity::new("user-001", "business-001"),
        SessionConfig::default(),
    )
    .await
    .expect("session start")
}

async fn located_report(session: &Session, lat: f64, lon: f64) -> String {
    session
        .submit_report(NewReport {
            description: "Dumped debris".into(),
            location: Some(GeoPoint::new(lat, lon)),
            analysis: None,
        })
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn dispatch_runs_the_full_timeline() {
    let session = start().await;
    let report_id = located_report(&session, 1.0, 2.0).await;

    session
        .dispatch_vehicle_to_report("V01", &report_id)
        .await
        .unwrap();

    // Immediate effects, before any delay elapses.
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::EnRoute);
    assert_eq!(vehicle.assigned_report_id.as_deref(), Some(report_id.as_str()));
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::InProgress
    );

    // After the travel delay: at the report location, collecting.
    tokio::time::sleep(Duration::from_secs(6)).await;
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Collecting);
    assert_eq!(vehicle.current_location, GeoPoint::new(1.0, 2.0));
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::InProgress
    );

    // After the collection delay: everything released.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Idle);
    assert!(vehicle.assigned_report_id.is_none());
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::Resolved
    );
}

#[tokio::test(start_paused = true)]
async fn redispatching_a_vehicle_supersedes_its_run() {
    let session = start().await;
    let first = located_report(&session, 1.0, 2.0).await;
    let second = located_report(&session, 3.0, 4.0).await;

    session.dispatch_vehicle_to_report("V01", &first).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(
        session.vehicle("V01").await.unwrap().status,
        VehicleStatus::Collecting
    );

    // Redirect mid-collection: the first run's completion must never fire.
    session.dispatch_vehicle_to_report("V01", &second).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Collecting);
    assert_eq!(vehicle.current_location, GeoPoint::new(3.0, 4.0));
    assert_eq!(
        session.report(&first).await.unwrap().status,
        ReportStatus::InProgress
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(
        session.report(&second).await.unwrap().status,
        ReportStatus::Resolved
    );
    // The abandoned report is still waiting; nothing stale resolved it.
    assert_eq!(
        session.report(&first).await.unwrap().status,
        ReportStatus::InProgress
    );
}

#[tokio::test(start_paused = true)]
async fn stealing_a_report_idles_the_previous_vehicle() {
    let session = start().await;
    let report_id = located_report(&session, 1.0, 2.0).await;

    session.dispatch_vehicle_to_report("V01", &report_id).await.unwrap();
    session.dispatch_vehicle_to_report("V02", &report_id).await.unwrap();

    let v01 = session.vehicle("V01").await.unwrap();
    assert_eq!(v01.status, VehicleStatus::Idle);
    assert!(v01.assigned_report_id.is_none());
    assert_eq!(
        session.vehicle("V02").await.unwrap().status,
        VehicleStatus::EnRoute
    );

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::Resolved
    );
    // V01's cancelled run never moved it.
    let v01 = session.vehicle("V01").await.unwrap();
    assert_eq!(v01.status, VehicleStatus::Idle);
    assert_eq!(v01.current_location, GeoPoint::new(28.6150, 77.2100));
    assert_eq!(
        session.vehicle("V02").await.unwrap().status,
        VehicleStatus::Idle
    );
}

#[tokio::test(start_paused = true)]
async fn manual_resolution_cancels_the_pending_run() {
    let session = start().await;
    let report_id = located_report(&session, 1.0, 2.0).await;

    session.dispatch_vehicle_to_report("V01", &report_id).await.unwrap();
    session
        .update_report_status(&report_id, ReportStatus::Resolved)
        .await
        .unwrap();

    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Idle);
    assert!(vehicle.assigned_report_id.is_none());

    // Let both delays pass: the cancelled run must not resurface.
    tokio::time::sleep(Duration::from_secs(11)).await;
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Idle);
    assert_eq!(vehicle.current_location, GeoPoint::new(28.6150, 77.2100));
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::Resolved
    );
}

#[tokio::test(start_paused = true)]
async fn report_without_location_gets_no_timers() {
    let session = start().await;
    let report_id = session
        .submit_report(NewReport {
            description: "No coordinates".into(),
            location: None,
            analysis: None,
        })
        .await
        .unwrap();

    session.dispatch_vehicle_to_report("V01", &report_id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(11)).await;

    // The vehicle stays en route until reassigned; the report stays open.
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::EnRoute);
    assert_eq!(vehicle.assigned_report_id.as_deref(), Some(report_id.as_str()));
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::InProgress
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_vehicle_still_walks_the_report_lifecycle() {
    let session = start().await;
    let report_id = located_report(&session, 1.0, 2.0).await;

    session.dispatch_vehicle_to_report("V99", &report_id).await.unwrap();
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::InProgress
    );

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(
        session.report(&report_id).await.unwrap().status,
        ReportStatus::Resolved
    );
    // The real fleet never moved.
    for vehicle in session.vehicles().await {
        assert_eq!(vehicle.status, VehicleStatus::Idle);
    }
}

#[tokio::test(start_paused = true)]
async fn dispatching_an_unknown_report_schedules_nothing() {
    let session = start().await;

    session
        .dispatch_vehicle_to_report("V01", "report-missing")
        .await
        .unwrap();
    let vehicle = session.vehicle("V01").await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::EnRoute);
    assert_eq!(vehicle.assigned_report_id.as_deref(), Some("report-missing"));

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(
        session.vehicle("V01").await.unwrap().status,
        VehicleStatus::EnRoute
    );
}
