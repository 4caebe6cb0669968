//! Collection fleet state. Vehicles live only in memory for the session;
//! they are never written to the persistence gateway.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub current_location: GeoPoint,
    pub status: VehicleStatus,
    /// A vehicle serves at most one report at a time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_report_id: Option<String>,
}

impl Vehicle {
    pub fn idle(id: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            current_location: location,
            status: VehicleStatus::Idle,
            assigned_report_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Idle,
    EnRoute,
    Collecting,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Idle => write!(f, "Idle"),
            VehicleStatus::EnRoute => write!(f, "En Route"),
            VehicleStatus::Collecting => write!(f, "Collecting"),
        }
    }
}
