//! Building compliance records.
//!
//! A building's status is set directly by the latest compliance action and
//! is deliberately not derived from its warning/penalty lists, so the lists
//! and the status can disagree. Last write wins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: String,
    pub name: String,
    pub address: String,
    pub status: BuildingStatus,
    /// Newest first.
    pub warnings: Vec<Warning>,
    /// Newest first.
    pub penalties: Vec<Penalty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingStatus {
    Compliant,
    WarningIssued,
    PenaltyActive,
}

impl fmt::Display for BuildingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingStatus::Compliant => write!(f, "Compliant"),
            BuildingStatus::WarningIssued => write!(f, "Warning Issued"),
            BuildingStatus::PenaltyActive => write!(f, "Penalty Active"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub id: String,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub reason: String,
}

/// A monetary penalty levied against a building. Created unresolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub id: String,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub amount: Decimal,
    pub description: String,
    pub resolved: bool,
}

/// Caller-supplied fields for a new penalty; id, timestamp, and the
/// unresolved flag are filled in by the engine.
#[derive(Debug, Clone)]
pub struct NewPenalty {
    pub amount: Decimal,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn penalty_amount_serializes_as_string() {
        let penalty = Penalty {
            id: "P1".into(),
            timestamp: datetime!(2024-05-10 09:30 UTC),
            amount: Decimal::new(150050, 2),
            description: "Unsegregated waste".into(),
            resolved: false,
        };
        let value = serde_json::to_value(&penalty).unwrap();
        assert_eq!(value["amount"], "1500.50");
        assert_eq!(value["resolved"], false);
    }
}
