//! Citizen activity history: waste classifications and waste reports.
//!
//! History is a single newest-first list of tagged items. Classification
//! payloads come from an external classifier and are stored opaquely; the
//! engine never looks inside them. Reports carry the compliance-facing
//! fields (status, penalty status, assigned building) that the rest of the
//! system mutates.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::geo::GeoPoint;

/// One entry in the user's activity history.
///
/// Serialized as an envelope `{id, timestamp, type, data}` where `type`
/// discriminates the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

/// The tagged payload of a history item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum HistoryEntry {
    /// Opaque classifier output, stored verbatim.
    Classification(serde_json::Value),
    Report(Report),
}

impl HistoryItem {
    /// Returns the report payload if this item is a report.
    pub fn as_report(&self) -> Option<&Report> {
        match &self.entry {
            HistoryEntry::Report(report) => Some(report),
            HistoryEntry::Classification(_) => None,
        }
    }

    pub fn as_report_mut(&mut self) -> Option<&mut Report> {
        match &mut self.entry {
            HistoryEntry::Report(report) => Some(report),
            HistoryEntry::Classification(_) => None,
        }
    }
}

/// A citizen waste report as held inside a history item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Optional analysis text attached by the classifier at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    pub status: ReportStatus,
    pub penalty_status: PenaltyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
}

/// Caller-supplied fields for a new report; status fields are defaulted by
/// the engine.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub description: String,
    pub location: Option<GeoPoint>,
    pub analysis: Option<String>,
}

/// Report lifecycle: `Pending -> InProgress -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "Pending"),
            ReportStatus::InProgress => write!(f, "In Progress"),
            ReportStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Penalty track of a report, independent of its lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyStatus {
    None,
    Issued,
    Paid,
}

impl fmt::Display for PenaltyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyStatus::None => write!(f, "None"),
            PenaltyStatus::Issued => write!(f, "Issued"),
            PenaltyStatus::Paid => write!(f, "Paid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn history_item_envelope_shape() {
        let item = HistoryItem {
            id: "report-1".into(),
            timestamp: datetime!(2024-03-01 12:00 UTC),
            entry: HistoryEntry::Report(Report {
                description: "Overflowing bin".into(),
                location: Some(GeoPoint::new(28.6, 77.2)),
                analysis: None,
                status: ReportStatus::Pending,
                penalty_status: PenaltyStatus::None,
                building_id: None,
            }),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "report");
        assert_eq!(value["data"]["status"], "Pending");
        assert_eq!(value["data"]["penaltyStatus"], "None");
        assert_eq!(value["timestamp"], "2024-03-01T12:00:00Z");
        // Absent optionals are omitted, not null.
        assert!(value["data"].get("buildingId").is_none());
    }

    #[test]
    fn classification_payload_survives_round_trip_untouched() {
        let payload = json!({"category": "e-waste", "confidence": 0.93, "bins": ["red"]});
        let item = HistoryItem {
            id: "cls-1".into(),
            timestamp: datetime!(2024-03-01 12:00 UTC),
            entry: HistoryEntry::Classification(payload.clone()),
        };

        let text = serde_json::to_string(&item).unwrap();
        let back: HistoryItem = serde_json::from_str(&text).unwrap();
        match back.entry {
            HistoryEntry::Classification(value) => assert_eq!(value, payload),
            HistoryEntry::Report(_) => panic!("expected classification"),
        }
    }

    #[test]
    fn report_status_uses_display_names_on_the_wire() {
        let text = serde_json::to_string(&ReportStatus::InProgress).unwrap();
        assert_eq!(text, "\"In Progress\"");
        let back: ReportStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(back, ReportStatus::InProgress);
    }
}
