//! Points and one-time badge unlocks.
//!
//! Points move unconditionally; badges are the gated path. A badge slug can
//! enter the unlocked set exactly once, and the catalog's point value is
//! granted at that moment only. Unlock triggers are evaluated off the
//! session's report counter rather than by the store itself.

use greenloop_core::{BadgeCatalog, BadgeSlug};

use crate::store::{CommandEffect, EntityStore};

/// Points granted to a session whose balance is exactly zero at start.
///
/// Keyed off the balance, not a granted flag: a user who spends back down
/// to zero is granted again next session. Observed behavior, kept as-is.
pub const WELCOME_BONUS: i64 = 50;

impl EntityStore {
    /// Adjust the profile's point balance. `delta` may be negative.
    pub fn add_points(&mut self, delta: i64) {
        self.profile.points += delta;
    }

    /// Unlock `slug` if it is not already unlocked, granting its catalog
    /// point value exactly once.
    ///
    /// A slug missing from a custom catalog still enters the unlocked set
    /// and grants nothing.
    pub fn unlock_badge(&mut self, slug: BadgeSlug, catalog: &BadgeCatalog) -> CommandEffect {
        if !self.profile.unlocked_badges.insert(slug) {
            return CommandEffect::NoOp;
        }
        match catalog.points_for(slug) {
            Some(points) => {
                self.add_points(points);
                tracing::debug!(badge = %slug, points, "badge unlocked");
            }
            None => {
                tracing::warn!(badge = %slug, "badge not in catalog; unlocked with no points");
            }
        }
        CommandEffect::Applied
    }

    /// Bump the session report counter and fire any unlock it reaches.
    ///
    /// The first report unlocks `eco-reporter`; the third unlocks
    /// `community-helper`.
    pub fn note_report_submitted(&mut self, catalog: &BadgeCatalog) {
        self.report_count += 1;
        match self.report_count {
            1 => {
                self.unlock_badge(BadgeSlug::EcoReporter, catalog);
            }
            3 => {
                self.unlock_badge(BadgeSlug::CommunityHelper, catalog);
            }
            _ => {}
        }
    }

    /// Grant the welcome bonus if the balance is exactly zero.
    pub fn apply_welcome_bonus(&mut self) {
        if self.profile.points == 0 {
            self.add_points(WELCOME_BONUS);
            tracing::debug!(points = WELCOME_BONUS, "welcome bonus granted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_twice_grants_points_once() {
        let mut store = EntityStore::new();
        let catalog = BadgeCatalog::default();

        assert!(store
            .unlock_badge(BadgeSlug::EcoReporter, &catalog)
            .is_applied());
        assert!(!store
            .unlock_badge(BadgeSlug::EcoReporter, &catalog)
            .is_applied());

        assert_eq!(store.profile.points, 50);
        assert_eq!(store.profile.unlocked_badges.len(), 1);
    }

    #[test]
    fn missing_catalog_entry_unlocks_without_points() {
        let mut store = EntityStore::new();
        let empty = BadgeCatalog::new(Vec::new());

        store.unlock_badge(BadgeSlug::QuizMaster, &empty);
        assert!(store.profile.has_badge(BadgeSlug::QuizMaster));
        assert_eq!(store.profile.points, 0);
    }

    #[test]
    fn report_counter_fires_triggers_at_one_and_three() {
        let mut store = EntityStore::new();
        let catalog = BadgeCatalog::default();

        store.note_report_submitted(&catalog);
        assert!(store.profile.has_badge(BadgeSlug::EcoReporter));
        assert!(!store.profile.has_badge(BadgeSlug::CommunityHelper));
        assert_eq!(store.profile.points, 50);

        store.note_report_submitted(&catalog);
        store.note_report_submitted(&catalog);
        assert!(store.profile.has_badge(BadgeSlug::CommunityHelper));
        assert_eq!(store.profile.points, 150);

        // Counts past three never re-fire.
        store.note_report_submitted(&catalog);
        assert_eq!(store.profile.points, 150);
    }

    #[test]
    fn welcome_bonus_only_at_zero_balance() {
        let mut store = EntityStore::new();
        store.apply_welcome_bonus();
        assert_eq!(store.profile.points, 50);

        store.apply_welcome_bonus();
        assert_eq!(store.profile.points, 50);

        // Spending back to zero re-arms the bonus. Intended behavior.
        store.add_points(-50);
        store.apply_welcome_bonus();
        assert_eq!(store.profile.points, 50);
    }
}
