use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::badge::BadgeSlug;

/// The current user's profile.
///
/// Only `name` and `building_id` survive a restart (persisted under their
/// own snapshot keys). Points and unlocked badges are session-scoped, which
/// is why a fresh session starts from zero and immediately earns the
/// welcome bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub building_id: Option<String>,
    pub points: i64,
    pub unlocked_badges: BTreeSet<BadgeSlug>,
}

impl UserProfile {
    pub const DEFAULT_NAME: &'static str = "Eco-Warrior";

    pub fn has_badge(&self, slug: BadgeSlug) -> bool {
        self.unlocked_badges.contains(&slug)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            building_id: None,
            points: 0,
            unlocked_badges: BTreeSet::new(),
        }
    }
}
