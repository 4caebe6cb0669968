//! The entity store: exclusive owner of every mutable collection.
//!
//! Components never hold private copies of entities; they operate on the
//! store through commands. Every mutating command either fully applies or
//! leaves the store untouched. Update commands given an unknown id are
//! logged no-ops, a deliberately permissive policy so admin tooling can
//! replay actions against stale views without faulting the engine.

use std::collections::BTreeMap;

use time::OffsetDateTime;
use uuid::Uuid;

use greenloop_core::{
    Building, BulkPickupRequest, Community, CommunityMember, CommunityMessage, EquipmentRequest,
    GeoPoint, HistoryEntry, HistoryItem, NewReport, PenaltyStatus, PickupRequest, Report,
    ReportStatus, UserProfile, Vehicle,
};

/// Whether a command changed anything.
///
/// Update commands aimed at an unknown id report [`CommandEffect::NoOp`]
/// instead of failing; callers use this to decide whether a snapshot write
/// is warranted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    Applied,
    NoOp,
}

impl CommandEffect {
    pub fn is_applied(self) -> bool {
        matches!(self, CommandEffect::Applied)
    }
}

/// Mint an entity id: a well-known prefix plus a random UUID.
pub(crate) fn fresh_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4())
}

/// All mutable entity collections plus the current user's profile.
///
/// Collections only grow or have fields mutated in place; nothing is ever
/// hard-deleted. History, pickups, and compliance lists are newest-first;
/// community rosters and message boards are append-ordered.
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub history: Vec<HistoryItem>,
    pub buildings: Vec<Building>,
    pub vehicles: Vec<Vehicle>,
    pub pickup_requests: Vec<PickupRequest>,
    pub bulk_pickup_requests: Vec<BulkPickupRequest>,
    pub equipment_requests: Vec<EquipmentRequest>,
    pub communities: Vec<Community>,
    pub community_members: BTreeMap<String, Vec<CommunityMember>>,
    pub community_messages: BTreeMap<String, Vec<CommunityMessage>>,
    pub profile: UserProfile,
    /// Reports submitted this session; feeds the badge unlock triggers.
    pub report_count: u32,
}

impl EntityStore {
    /// An empty store with the standing fleet.
    ///
    /// Vehicles are session-scoped: every store starts with the same two
    /// idle trucks regardless of what the gateway holds.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            buildings: Vec::new(),
            vehicles: standing_fleet(),
            pickup_requests: Vec::new(),
            bulk_pickup_requests: Vec::new(),
            equipment_requests: Vec::new(),
            communities: Vec::new(),
            community_members: BTreeMap::new(),
            community_messages: BTreeMap::new(),
            profile: UserProfile::default(),
            report_count: 0,
        }
    }

    // ─── History ─────────────────────────────────────────────────────

    /// Record a new citizen waste report at the front of the history.
    ///
    /// Status fields start at `Pending`/`None`; the compliance workflow
    /// moves them from there. Returns the new item's id. Does not bump the
    /// badge trigger counter; the session does that so triggers and
    /// persistence stay together.
    pub fn add_report(&mut self, report: NewReport, now: OffsetDateTime) -> String {
        let id = fresh_id("report-");
        self.history.insert(
            0,
            HistoryItem {
                id: id.clone(),
                timestamp: now,
                entry: HistoryEntry::Report(Report {
                    description: report.description,
                    location: report.location,
                    analysis: report.analysis,
                    status: ReportStatus::Pending,
                    penalty_status: PenaltyStatus::None,
                    building_id: None,
                }),
            },
        );
        id
    }

    /// Record an opaque classifier result at the front of the history.
    pub fn add_classification(&mut self, result: serde_json::Value, now: OffsetDateTime) -> String {
        let id = fresh_id("cls-");
        self.history.insert(
            0,
            HistoryItem {
                id: id.clone(),
                timestamp: now,
                entry: HistoryEntry::Classification(result),
            },
        );
        id
    }

    /// The report payload of a history item, if `id` names a report.
    pub fn report(&self, id: &str) -> Option<&Report> {
        self.history
            .iter()
            .find(|item| item.id == id)
            .and_then(HistoryItem::as_report)
    }

    pub(crate) fn report_mut(&mut self, id: &str) -> Option<&mut Report> {
        self.history
            .iter_mut()
            .find(|item| item.id == id)
            .and_then(HistoryItem::as_report_mut)
    }

    // ─── Lookups ─────────────────────────────────────────────────────

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub(crate) fn building_mut(&mut self, id: &str) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub(crate) fn vehicle_mut(&mut self, id: &str) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    pub fn community(&self, id: &str) -> Option<&Community> {
        self.communities.iter().find(|c| c.id == id)
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The two collection trucks every session starts with.
pub fn standing_fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::idle("V01", GeoPoint::new(28.6150, 77.2100)),
        Vehicle::idle("V02", GeoPoint::new(28.6100, 77.2050)),
    ]
}
