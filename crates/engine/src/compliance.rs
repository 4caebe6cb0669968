//! Compliance workflow: report lifecycle and building warnings/penalties.
//!
//! Report status runs `Pending -> InProgress -> Resolved`; penalty status is
//! a parallel track with no transition constraints. A building's status is
//! forced by whichever compliance action ran last, so a warning after a
//! penalty flips the building back to `WarningIssued` while both lists keep
//! their entries. Last write wins; no precedence is enforced.

use time::OffsetDateTime;

use greenloop_core::{BuildingStatus, NewPenalty, Penalty, PenaltyStatus, ReportStatus, Warning};

use crate::store::{fresh_id, CommandEffect, EntityStore};

impl EntityStore {
    /// Set a report's lifecycle status. Unknown ids are logged no-ops.
    pub fn update_report_status(&mut self, report_id: &str, status: ReportStatus) -> CommandEffect {
        match self.report_mut(report_id) {
            Some(report) => {
                report.status = status;
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(report_id, %status, "status update for unknown report; ignoring");
                CommandEffect::NoOp
            }
        }
    }

    /// Set a report's penalty track. Unknown ids are logged no-ops.
    pub fn update_report_penalty_status(
        &mut self,
        report_id: &str,
        status: PenaltyStatus,
    ) -> CommandEffect {
        match self.report_mut(report_id) {
            Some(report) => {
                report.penalty_status = status;
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(
                    report_id,
                    %status,
                    "penalty status update for unknown report; ignoring"
                );
                CommandEffect::NoOp
            }
        }
    }

    /// Point a report at a building.
    ///
    /// The building id is recorded as given; it is not checked against the
    /// building list. Unknown report ids are logged no-ops.
    pub fn assign_building_to_report(
        &mut self,
        report_id: &str,
        building_id: &str,
    ) -> CommandEffect {
        match self.report_mut(report_id) {
            Some(report) => {
                report.building_id = Some(building_id.to_string());
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(report_id, building_id, "building assignment for unknown report; ignoring");
                CommandEffect::NoOp
            }
        }
    }

    /// Prepend a warning and force the building to `WarningIssued`,
    /// regardless of its previous status.
    pub fn add_warning_to_building(
        &mut self,
        building_id: &str,
        reason: &str,
        now: OffsetDateTime,
    ) -> CommandEffect {
        match self.building_mut(building_id) {
            Some(building) => {
                building.warnings.insert(
                    0,
                    Warning {
                        id: fresh_id("W"),
                        timestamp: now,
                        reason: reason.to_string(),
                    },
                );
                building.status = BuildingStatus::WarningIssued;
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(building_id, "warning for unknown building; ignoring");
                CommandEffect::NoOp
            }
        }
    }

    /// Prepend an unresolved penalty and force the building to
    /// `PenaltyActive`.
    pub fn add_penalty_to_building(
        &mut self,
        building_id: &str,
        penalty: NewPenalty,
        now: OffsetDateTime,
    ) -> CommandEffect {
        match self.building_mut(building_id) {
            Some(building) => {
                building.penalties.insert(
                    0,
                    Penalty {
                        id: fresh_id("P"),
                        timestamp: now,
                        amount: penalty.amount,
                        description: penalty.description,
                        resolved: false,
                    },
                );
                building.status = BuildingStatus::PenaltyActive;
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(building_id, "penalty for unknown building; ignoring");
                CommandEffect::NoOp
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenloop_core::{Building, NewReport};
    use rust_decimal::Decimal;
    use time::macros::datetime;

    fn now() -> OffsetDateTime {
        datetime!(2024-06-01 10:00 UTC)
    }

    fn store_with_building() -> EntityStore {
        let mut store = EntityStore::new();
        store.buildings.push(Building {
            id: "BLD001".into(),
            name: "Greenview Apartments".into(),
            address: "123 Park Lane".into(),
            status: BuildingStatus::Compliant,
            warnings: Vec::new(),
            penalties: Vec::new(),
        });
        store
    }

    #[test]
    fn report_status_walks_the_lifecycle() {
        let mut store = EntityStore::new();
        let id = store.add_report(
            NewReport {
                description: "Litter".into(),
                location: None,
                analysis: None,
            },
            now(),
        );

        assert!(store
            .update_report_status(&id, ReportStatus::InProgress)
            .is_applied());
        assert!(store
            .update_report_status(&id, ReportStatus::Resolved)
            .is_applied());
        assert_eq!(store.report(&id).unwrap().status, ReportStatus::Resolved);
    }

    #[test]
    fn unknown_report_updates_change_nothing() {
        let mut store = EntityStore::new();
        assert!(!store
            .update_report_status("report-missing", ReportStatus::Resolved)
            .is_applied());
        assert!(!store
            .update_report_penalty_status("report-missing", PenaltyStatus::Issued)
            .is_applied());
        assert!(!store
            .assign_building_to_report("report-missing", "BLD001")
            .is_applied());
        assert!(store.history.is_empty());
    }

    #[test]
    fn building_assignment_does_not_validate_the_building() {
        let mut store = EntityStore::new();
        let id = store.add_report(
            NewReport {
                description: "Litter".into(),
                location: None,
                analysis: None,
            },
            now(),
        );

        store.assign_building_to_report(&id, "BLD999");
        assert_eq!(store.report(&id).unwrap().building_id.as_deref(), Some("BLD999"));
    }

    #[test]
    fn warning_then_penalty_leaves_penalty_active_with_both_entries() {
        let mut store = store_with_building();

        store.add_warning_to_building("BLD001", "Unsegregated waste", now());
        store.add_penalty_to_building(
            "BLD001",
            NewPenalty {
                amount: Decimal::new(5000, 0),
                description: "Repeat violation".into(),
            },
            now(),
        );

        let building = store.building("BLD001").unwrap();
        assert_eq!(building.status, BuildingStatus::PenaltyActive);
        assert_eq!(building.warnings.len(), 1);
        assert_eq!(building.penalties.len(), 1);
        assert!(!building.penalties[0].resolved);
    }

    #[test]
    fn warning_after_penalty_flips_status_back() {
        let mut store = store_with_building();

        store.add_penalty_to_building(
            "BLD001",
            NewPenalty {
                amount: Decimal::new(5000, 0),
                description: "Repeat violation".into(),
            },
            now(),
        );
        store.add_warning_to_building("BLD001", "Further littering", now());

        let building = store.building("BLD001").unwrap();
        // Last write wins; the penalty stays in its list regardless.
        assert_eq!(building.status, BuildingStatus::WarningIssued);
        assert_eq!(building.penalties.len(), 1);
    }

    #[test]
    fn newest_warning_sits_at_the_front() {
        let mut store = store_with_building();
        store.add_warning_to_building("BLD001", "first", now());
        store.add_warning_to_building("BLD001", "second", now());
        let building = store.building("BLD001").unwrap();
        assert_eq!(building.warnings[0].reason, "second");
    }
}
