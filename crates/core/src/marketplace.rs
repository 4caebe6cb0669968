//! Marketplace entities: consumer pickup requests, B2B bulk pickups, and
//! worker equipment requests.
//!
//! Status fields carry no transition table; any value may follow any other.
//! Updates go through the engine's permissive by-id commands.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

// ─── Consumer pickups ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    pub id: String,
    pub user_id: String,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub status: PickupStatus,
    pub waste_type: String,
    pub quantity: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewPickupRequest {
    pub waste_type: String,
    pub quantity: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupStatus {
    Pending,
    Accepted,
    Collected,
    Resolved,
}

impl fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupStatus::Pending => write!(f, "Pending"),
            PickupStatus::Accepted => write!(f, "Accepted"),
            PickupStatus::Collected => write!(f, "Collected"),
            PickupStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

// ─── B2B bulk pickups ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPickupRequest {
    pub id: String,
    pub business_id: String,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub status: BulkPickupStatus,
    pub material: String,
    pub estimated_weight_kg: f64,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewBulkPickupRequest {
    pub material: String,
    pub estimated_weight_kg: f64,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkPickupStatus {
    Requested,
    Quoted,
    Scheduled,
    Completed,
}

impl fmt::Display for BulkPickupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkPickupStatus::Requested => write!(f, "Requested"),
            BulkPickupStatus::Quoted => write!(f, "Quoted"),
            BulkPickupStatus::Scheduled => write!(f, "Scheduled"),
            BulkPickupStatus::Completed => write!(f, "Completed"),
        }
    }
}

// ─── Worker equipment ────────────────────────────────────────────────

/// A field worker's request for safety equipment, addressed to a named
/// authority. Session-scoped; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRequest {
    pub id: String,
    pub worker_id: String,
    pub items: Vec<String>,
    pub authority_name: String,
    pub status: EquipmentStatus,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    Pending,
    Approved,
    Denied,
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentStatus::Pending => write!(f, "Pending"),
            EquipmentStatus::Approved => write!(f, "Approved"),
            EquipmentStatus::Denied => write!(f, "Denied"),
        }
    }
}
