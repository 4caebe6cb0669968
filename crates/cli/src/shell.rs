//! `greenloop shell` -- interactive session REPL.
//!
//! One command per line. Mutating commands go through the engine session,
//! so everything typed here is validated, badge-triggering, moderated, and
//! written through to the state file exactly as a frontend action would be.
//! Dispatch timers run in the background; `vehicles` shows their progress.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;

use greenloop_core::{
    BulkPickupStatus, GeoPoint, HistoryEntry, NewBulkPickupRequest, NewPenalty, NewPickupRequest,
    NewReport, PenaltyStatus, PickupStatus, ReportStatus,
};
use greenloop_engine::{SendOutcome, Session};

pub async fn run(session: Session) -> Result<(), Box<dyn std::error::Error>> {
    let profile = session.profile().await;
    println!();
    println!("  Greenloop: welcome, {} ({} points)", profile.name, profile.points);
    println!();
    println!("  Type 'help' for commands, 'quit' to leave.");
    println!();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("greenloop> ");
        if io::stdout().flush().is_err() {
            break;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl-D)
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("error reading input: {e}");
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (cmd, rest) = split_command(trimmed);

        let result = match cmd.as_str() {
            "help" => {
                print_help();
                Ok(())
            }
            "report" => cmd_report(&session, rest).await,
            "history" => cmd_history(&session).await,
            "status" => cmd_status(&session, rest).await,
            "penalty-status" => cmd_penalty_status(&session, rest).await,
            "assign" => cmd_assign(&session, rest).await,
            "buildings" => cmd_buildings(&session).await,
            "warn" => cmd_warn(&session, rest).await,
            "penalty" => cmd_penalty(&session, rest).await,
            "vehicles" => cmd_vehicles(&session).await,
            "dispatch" => cmd_dispatch(&session, rest).await,
            "communities" => cmd_communities(&session).await,
            "create" => cmd_create(&session, rest).await,
            "join" => cmd_join(&session, rest).await,
            "say" => cmd_say(&session, rest).await,
            "messages" => cmd_messages(&session, rest).await,
            "pickups" => cmd_pickups(&session).await,
            "pickup" => cmd_pickup(&session, rest).await,
            "pickup-status" => cmd_pickup_status(&session, rest).await,
            "bulk" => cmd_bulk(&session, rest).await,
            "bulk-status" => cmd_bulk_status(&session, rest).await,
            "equipment" => cmd_equipment(&session, rest).await,
            "badges" => cmd_badges(&session).await,
            "profile" => cmd_profile(&session).await,
            "name" => cmd_name(&session, rest).await,
            "mybuilding" => cmd_mybuilding(&session, rest).await,
            "quit" | "exit" => break,
            _ => {
                eprintln!("unknown command: {cmd}. Type 'help' for available commands.");
                Ok(())
            }
        };
        if let Err(e) = result {
            eprintln!("  error: {e}");
        }
    }
    Ok(())
}

fn split_command(line: &str) -> (String, &str) {
    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (line.to_lowercase(), ""),
    }
}

fn print_help() {
    println!();
    println!("  report [@lat,lon] <description>     Submit a waste report");
    println!("  history                             List history, newest first");
    println!("  status <report-id> <status>         Set report status (pending|in-progress|resolved)");
    println!("  penalty-status <report-id> <s>      Set report penalty track (none|issued|paid)");
    println!("  assign <report-id> <building-id>    Point a report at a building");
    println!("  buildings                           List the building register");
    println!("  warn <building-id> <reason>         Issue a warning to a building");
    println!("  penalty <building-id> <amt> <desc>  Levy a penalty on a building");
    println!("  vehicles                            Show the fleet");
    println!("  dispatch <vehicle-id> <report-id>   Send a vehicle to a report");
    println!("  communities                         List communities");
    println!("  create <name> <area> <description>  Create a community (auto-joins you)");
    println!("  join <community-id>                 Join a community");
    println!("  say <community-id> <text>           Send a message (moderated)");
    println!("  messages <community-id>             Show a community's board");
    println!("  pickups                             List pickup and bulk pickup requests");
    println!("  pickup <type> <quantity> <address>  Request a pickup");
    println!("  pickup-status <id> <status>         pending|accepted|collected|resolved");
    println!("  bulk <material> <kg> <address>      Request a B2B bulk pickup");
    println!("  bulk-status <id> <status>           requested|quoted|scheduled|completed");
    println!("  equipment <authority> <i1,i2,...>   File a worker equipment request");
    println!("  badges                              Badge catalog and unlocks");
    println!("  profile                             Show the profile");
    println!("  name <new name>                     Rename yourself");
    println!("  mybuilding <building-id|->          Set or clear your building");
    println!("  quit                                Exit");
    println!();
}

// ─── Reports & compliance ────────────────────────────────────────────

async fn cmd_report(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    if rest.is_empty() {
        eprintln!("usage: report [@lat,lon] <description>");
        return Ok(());
    }
    let (location, description) = match rest.strip_prefix('@') {
        Some(tail) => {
            let Some((coords, description)) = tail.split_once(char::is_whitespace) else {
                eprintln!("usage: report @lat,lon <description>");
                return Ok(());
            };
            match parse_geo(coords) {
                Some(point) => (Some(point), description.trim()),
                None => {
                    eprintln!("  could not parse coordinates '{coords}' (expected lat,lon)");
                    return Ok(());
                }
            }
        }
        None => (None, rest),
    };
    let id = session
        .submit_report(NewReport {
            description: description.to_string(),
            location,
            analysis: None,
        })
        .await?;
    println!("  report filed: {id}");
    Ok(())
}

async fn cmd_history(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let history = session.history().await;
    if history.is_empty() {
        println!("  history is empty");
        return Ok(());
    }
    println!();
    for item in &history {
        match &item.entry {
            HistoryEntry::Report(report) => {
                let building = report
                    .building_id
                    .as_deref()
                    .map(|id| format!(", building {id}"))
                    .unwrap_or_default();
                println!(
                    "  [{}] report: {} (status: {}, penalty: {}{})",
                    item.id, report.description, report.status, report.penalty_status, building
                );
            }
            HistoryEntry::Classification(_) => {
                println!("  [{}] classification", item.id);
            }
        }
    }
    println!();
    Ok(())
}

async fn cmd_status(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((id, raw)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: status <report-id> <pending|in-progress|resolved>");
        return Ok(());
    };
    let Some(status) = parse_report_status(raw.trim()) else {
        eprintln!("  unknown status '{}'", raw.trim());
        return Ok(());
    };
    if session.update_report_status(id, status).await?.is_applied() {
        println!("  {id} -> {status}");
    } else {
        println!("  no such report: {id}");
    }
    Ok(())
}

async fn cmd_penalty_status(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((id, raw)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: penalty-status <report-id> <none|issued|paid>");
        return Ok(());
    };
    let Some(status) = parse_penalty_status(raw.trim()) else {
        eprintln!("  unknown penalty status '{}'", raw.trim());
        return Ok(());
    };
    if session
        .update_report_penalty_status(id, status)
        .await?
        .is_applied()
    {
        println!("  {id} penalty track -> {status}");
    } else {
        println!("  no such report: {id}");
    }
    Ok(())
}

async fn cmd_assign(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((report_id, building_id)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: assign <report-id> <building-id>");
        return Ok(());
    };
    if session
        .assign_building_to_report(report_id, building_id.trim())
        .await?
        .is_applied()
    {
        println!("  {report_id} -> building {}", building_id.trim());
    } else {
        println!("  no such report: {report_id}");
    }
    Ok(())
}

async fn cmd_buildings(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    for building in session.buildings().await {
        println!(
            "  {} {} ({}) -- {}",
            building.id, building.name, building.address, building.status
        );
        for warning in &building.warnings {
            println!("    warning [{}]: {}", warning.id, warning.reason);
        }
        for penalty in &building.penalties {
            let state = if penalty.resolved { "resolved" } else { "open" };
            println!(
                "    penalty [{}]: {} ({}, {state})",
                penalty.id, penalty.description, penalty.amount
            );
        }
    }
    println!();
    Ok(())
}

async fn cmd_warn(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((building_id, reason)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: warn <building-id> <reason>");
        return Ok(());
    };
    if session
        .add_warning_to_building(building_id, reason.trim())
        .await?
        .is_applied()
    {
        println!("  warning issued to {building_id}");
    } else {
        println!("  no such building: {building_id}");
    }
    Ok(())
}

async fn cmd_penalty(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = rest.splitn(3, char::is_whitespace).collect();
    if parts.len() < 3 {
        eprintln!("usage: penalty <building-id> <amount> <description>");
        return Ok(());
    }
    let Ok(amount) = Decimal::from_str(parts[1]) else {
        eprintln!("  could not parse amount '{}'", parts[1]);
        return Ok(());
    };
    if session
        .add_penalty_to_building(
            parts[0],
            NewPenalty {
                amount,
                description: parts[2].trim().to_string(),
            },
        )
        .await?
        .is_applied()
    {
        println!("  penalty of {amount} levied on {}", parts[0]);
    } else {
        println!("  no such building: {}", parts[0]);
    }
    Ok(())
}

// ─── Fleet ───────────────────────────────────────────────────────────

async fn cmd_vehicles(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    for vehicle in session.vehicles().await {
        let assignment = vehicle
            .assigned_report_id
            .as_deref()
            .map(|id| format!(" -> {id}"))
            .unwrap_or_default();
        println!(
            "  {} {} at ({:.4}, {:.4}){}",
            vehicle.id,
            vehicle.status,
            vehicle.current_location.latitude,
            vehicle.current_location.longitude,
            assignment
        );
    }
    println!();
    Ok(())
}

async fn cmd_dispatch(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((vehicle_id, report_id)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: dispatch <vehicle-id> <report-id>");
        return Ok(());
    };
    session
        .dispatch_vehicle_to_report(vehicle_id, report_id.trim())
        .await?;
    println!("  {vehicle_id} dispatched to {}", report_id.trim());
    Ok(())
}

// ─── Communities ─────────────────────────────────────────────────────

async fn cmd_communities(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let communities = session.communities().await;
    if communities.is_empty() {
        println!("  no communities yet; try 'create'");
        return Ok(());
    }
    println!();
    for community in &communities {
        let members = session.community_members(&community.id).await;
        println!(
            "  [{}] {} -- {} ({} member(s))",
            community.id,
            community.name,
            community.description,
            members.len()
        );
    }
    println!();
    Ok(())
}

async fn cmd_create(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = rest.splitn(3, char::is_whitespace).collect();
    if parts.len() < 3 {
        eprintln!("usage: create <name> <area> <description>");
        return Ok(());
    }
    let community = session
        .create_community(parts[0], parts[2].trim(), parts[1])
        .await?;
    println!("  created {} [{}]", community.name, community.id);
    Ok(())
}

async fn cmd_join(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    if rest.is_empty() {
        eprintln!("usage: join <community-id>");
        return Ok(());
    }
    if session.join_community(rest).await?.is_applied() {
        println!("  joined {rest}");
    } else {
        println!("  already a member of {rest}");
    }
    Ok(())
}

async fn cmd_say(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((community_id, text)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: say <community-id> <text>");
        return Ok(());
    };
    match session.send_message(community_id, text.trim()).await? {
        SendOutcome::Sent(message) => println!("  sent [{}]", message.id),
        SendOutcome::Rejected { reason } => println!("  rejected: {reason}"),
    }
    Ok(())
}

async fn cmd_messages(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    if rest.is_empty() {
        eprintln!("usage: messages <community-id>");
        return Ok(());
    }
    let messages = session.community_messages(rest).await;
    if messages.is_empty() {
        println!("  no messages");
        return Ok(());
    }
    println!();
    for message in &messages {
        println!("  {}: {}", message.sender_name, message.text);
    }
    println!();
    Ok(())
}

// ─── Marketplace ─────────────────────────────────────────────────────

async fn cmd_pickups(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  Pickup requests:");
    for request in session.pickup_requests().await {
        println!(
            "    [{}] {} ({}) at {} -- {}",
            request.id, request.waste_type, request.quantity, request.address, request.status
        );
    }
    println!("  Bulk pickup requests:");
    for request in session.bulk_pickup_requests().await {
        println!(
            "    [{}] {} ({} kg) at {} -- {}",
            request.id,
            request.material,
            request.estimated_weight_kg,
            request.address,
            request.status
        );
    }
    println!();
    Ok(())
}

async fn cmd_pickup(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = rest.splitn(3, char::is_whitespace).collect();
    if parts.len() < 3 {
        eprintln!("usage: pickup <waste-type> <quantity> <address>");
        return Ok(());
    }
    let id = session
        .add_pickup_request(NewPickupRequest {
            waste_type: parts[0].to_string(),
            quantity: parts[1].to_string(),
            address: parts[2].trim().to_string(),
        })
        .await?;
    println!("  pickup requested: {id}");
    Ok(())
}

async fn cmd_pickup_status(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((id, raw)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: pickup-status <id> <pending|accepted|collected|resolved>");
        return Ok(());
    };
    let Some(status) = parse_pickup_status(raw.trim()) else {
        eprintln!("  unknown status '{}'", raw.trim());
        return Ok(());
    };
    if session.update_pickup_status(id, status).await?.is_applied() {
        println!("  {id} -> {status}");
    } else {
        println!("  no such pickup request: {id}");
    }
    Ok(())
}

async fn cmd_bulk(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = rest.splitn(3, char::is_whitespace).collect();
    if parts.len() < 3 {
        eprintln!("usage: bulk <material> <kg> <address>");
        return Ok(());
    }
    let Ok(weight) = parts[1].parse::<f64>() else {
        eprintln!("  could not parse weight '{}'", parts[1]);
        return Ok(());
    };
    let id = session
        .add_bulk_pickup_request(NewBulkPickupRequest {
            material: parts[0].to_string(),
            estimated_weight_kg: weight,
            address: parts[2].trim().to_string(),
        })
        .await?;
    println!("  bulk pickup requested: {id}");
    Ok(())
}

async fn cmd_bulk_status(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((id, raw)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: bulk-status <id> <requested|quoted|scheduled|completed>");
        return Ok(());
    };
    let Some(status) = parse_bulk_status(raw.trim()) else {
        eprintln!("  unknown status '{}'", raw.trim());
        return Ok(());
    };
    if session
        .update_bulk_pickup_status(id, status)
        .await?
        .is_applied()
    {
        println!("  {id} -> {status}");
    } else {
        println!("  no such bulk pickup request: {id}");
    }
    Ok(())
}

async fn cmd_equipment(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((authority, items)) = rest.split_once(char::is_whitespace) else {
        eprintln!("usage: equipment <authority> <item,item,...>");
        return Ok(());
    };
    let items: Vec<String> = items
        .trim()
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        eprintln!("usage: equipment <authority> <item,item,...>");
        return Ok(());
    }
    let id = session.add_equipment_request(items, authority).await;
    println!("  equipment request filed: {id}");
    Ok(())
}

// ─── Profile & badges ────────────────────────────────────────────────

async fn cmd_badges(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let profile = session.profile().await;
    println!();
    for badge in session.catalog().iter() {
        let mark = if profile.has_badge(badge.slug) { "*" } else { " " };
        println!(
            "  {mark} {} ({} pts) -- {}",
            badge.slug, badge.points, badge.description
        );
    }
    println!();
    Ok(())
}

async fn cmd_profile(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let profile = session.profile().await;
    println!();
    println!("  {} -- {} points", profile.name, profile.points);
    println!(
        "  building: {}",
        profile.building_id.as_deref().unwrap_or("(none)")
    );
    println!("  badges unlocked: {}", profile.unlocked_badges.len());
    println!();
    Ok(())
}

async fn cmd_name(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    if rest.is_empty() {
        eprintln!("usage: name <new name>");
        return Ok(());
    }
    session.set_user_name(rest).await?;
    println!("  hello, {rest}");
    Ok(())
}

async fn cmd_mybuilding(session: &Session, rest: &str) -> Result<(), Box<dyn std::error::Error>> {
    if rest.is_empty() {
        eprintln!("usage: mybuilding <building-id|->");
        return Ok(());
    }
    let building_id = if rest == "-" { "" } else { rest };
    session.set_assigned_building(building_id).await?;
    if building_id.is_empty() {
        println!("  building assignment cleared");
    } else {
        println!("  assigned to {building_id}");
    }
    Ok(())
}

// ─── Parsers ─────────────────────────────────────────────────────────

fn parse_geo(coords: &str) -> Option<GeoPoint> {
    let (lat, lon) = coords.split_once(',')?;
    Some(GeoPoint::new(
        lat.trim().parse().ok()?,
        lon.trim().parse().ok()?,
    ))
}

fn parse_report_status(raw: &str) -> Option<ReportStatus> {
    match raw.to_lowercase().as_str() {
        "pending" => Some(ReportStatus::Pending),
        "in-progress" | "inprogress" => Some(ReportStatus::InProgress),
        "resolved" => Some(ReportStatus::Resolved),
        _ => None,
    }
}

fn parse_penalty_status(raw: &str) -> Option<PenaltyStatus> {
    match raw.to_lowercase().as_str() {
        "none" => Some(PenaltyStatus::None),
        "issued" => Some(PenaltyStatus::Issued),
        "paid" => Some(PenaltyStatus::Paid),
        _ => None,
    }
}

fn parse_pickup_status(raw: &str) -> Option<PickupStatus> {
    match raw.to_lowercase().as_str() {
        "pending" => Some(PickupStatus::Pending),
        "accepted" => Some(PickupStatus::Accepted),
        "collected" => Some(PickupStatus::Collected),
        "resolved" => Some(PickupStatus::Resolved),
        _ => None,
    }
}

fn parse_bulk_status(raw: &str) -> Option<BulkPickupStatus> {
    match raw.to_lowercase().as_str() {
        "requested" => Some(BulkPickupStatus::Requested),
        "quoted" => Some(BulkPickupStatus::Quoted),
        "scheduled" => Some(BulkPickupStatus::Scheduled),
        "completed" => Some(BulkPickupStatus::Completed),
        _ => None,
    }
}
