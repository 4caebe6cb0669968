//! Greenloop domain types.
//!
//! Pure data definitions for the civic waste-management engine: citizen
//! history items (classifications and reports), building compliance records,
//! collection fleet state, communities and their messages, marketplace
//! pickup requests, and the gamification badge catalog. Everything here is
//! plain serde-serializable data; behavior lives in `greenloop-engine`.
//!
//! Persisted shapes use camelCase field names and RFC 3339 timestamp
//! strings, matching the snapshot format read back at session start.

pub mod badge;
pub mod building;
pub mod community;
pub mod fleet;
pub mod geo;
pub mod history;
pub mod identity;
pub mod marketplace;
pub mod profile;

pub use badge::{Badge, BadgeCatalog, BadgeSlug};
pub use building::{Building, BuildingStatus, NewPenalty, Penalty, Warning};
pub use community::{Community, CommunityMember, CommunityMessage};
pub use fleet::{Vehicle, VehicleStatus};
pub use geo::GeoPoint;
pub use history::{HistoryEntry, HistoryItem, NewReport, PenaltyStatus, Report, ReportStatus};
pub use identity::Identity;
pub use marketplace::{
    BulkPickupRequest, BulkPickupStatus, EquipmentRequest, EquipmentStatus, NewBulkPickupRequest,
    NewPickupRequest, PickupRequest, PickupStatus,
};
pub use profile::UserProfile;
