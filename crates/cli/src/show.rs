//! `greenloop show` -- one-shot state summary.

use serde_json::json;

use greenloop_core::HistoryEntry;
use greenloop_engine::Session;

use crate::OutputFormat;

pub async fn run(session: &Session, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Text => print_text(session).await,
        OutputFormat::Json => print_json(session).await?,
    }
    Ok(())
}

async fn print_text(session: &Session) {
    let profile = session.profile().await;
    println!();
    println!("  Greenloop state summary");
    println!();
    println!("  Profile: {} ({} points)", profile.name, profile.points);
    if let Some(building_id) = &profile.building_id {
        println!("  Assigned building: {building_id}");
    }
    if !profile.unlocked_badges.is_empty() {
        let badges: Vec<String> = profile
            .unlocked_badges
            .iter()
            .map(|slug| slug.to_string())
            .collect();
        println!("  Badges: {}", badges.join(", "));
    }

    let history = session.history().await;
    let reports = history.iter().filter(|i| i.as_report().is_some()).count();
    println!();
    println!(
        "  History: {} item(s) ({} report(s), {} classification(s))",
        history.len(),
        reports,
        history.len() - reports
    );
    for item in history.iter().take(5) {
        match &item.entry {
            HistoryEntry::Report(report) => {
                println!("    [{}] {} -- {}", item.id, report.status, report.description)
            }
            HistoryEntry::Classification(_) => {
                println!("    [{}] classification", item.id)
            }
        }
    }

    println!();
    println!("  Buildings:");
    for building in session.buildings().await {
        println!(
            "    {} {} -- {} ({} warning(s), {} penalty(ies))",
            building.id,
            building.name,
            building.status,
            building.warnings.len(),
            building.penalties.len()
        );
    }

    println!();
    println!("  Fleet:");
    for vehicle in session.vehicles().await {
        let assignment = vehicle
            .assigned_report_id
            .as_deref()
            .map(|id| format!(" -> {id}"))
            .unwrap_or_default();
        println!("    {} {}{}", vehicle.id, vehicle.status, assignment);
    }

    let communities = session.communities().await;
    let pickups = session.pickup_requests().await;
    let bulk = session.bulk_pickup_requests().await;
    println!();
    println!(
        "  {} community(ies), {} pickup request(s), {} bulk pickup request(s)",
        communities.len(),
        pickups.len(),
        bulk.len()
    );
    println!();
}

async fn print_json(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let profile = session.profile().await;
    let summary = json!({
        "profile": profile,
        "history": session.history().await,
        "buildings": session.buildings().await,
        "vehicles": session.vehicles().await,
        "communities": session.communities().await,
        "pickupRequests": session.pickup_requests().await,
        "bulkPickupRequests": session.bulk_pickup_requests().await,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
