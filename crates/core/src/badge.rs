//! The badge catalog: static lookup data mapping badge slugs to point
//! values and unlock-criteria text. The engine treats the catalog as
//! read-only; which badges a user has unlocked lives on the profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of badge identifiers, serialized kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeSlug {
    EcoReporter,
    CommunityHelper,
    QuizMaster,
    WasteWizard,
    EcoCurious,
}

impl BadgeSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeSlug::EcoReporter => "eco-reporter",
            BadgeSlug::CommunityHelper => "community-helper",
            BadgeSlug::QuizMaster => "quiz-master",
            BadgeSlug::WasteWizard => "waste-wizard",
            BadgeSlug::EcoCurious => "eco-curious",
        }
    }
}

impl fmt::Display for BadgeSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeSlug {
    type Err = UnknownBadgeSlug;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eco-reporter" => Ok(BadgeSlug::EcoReporter),
            "community-helper" => Ok(BadgeSlug::CommunityHelper),
            "quiz-master" => Ok(BadgeSlug::QuizMaster),
            "waste-wizard" => Ok(BadgeSlug::WasteWizard),
            "eco-curious" => Ok(BadgeSlug::EcoCurious),
            other => Err(UnknownBadgeSlug(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBadgeSlug(pub String);

impl fmt::Display for UnknownBadgeSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown badge slug: {}", self.0)
    }
}

impl std::error::Error for UnknownBadgeSlug {}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub slug: BadgeSlug,
    pub points: i64,
    pub description: String,
}

/// The full catalog, loaded once at startup and treated as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<Badge>) -> Self {
        Self { badges }
    }

    pub fn get(&self, slug: BadgeSlug) -> Option<&Badge> {
        self.badges.iter().find(|badge| badge.slug == slug)
    }

    pub fn points_for(&self, slug: BadgeSlug) -> Option<i64> {
        self.get(slug).map(|badge| badge.points)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        fn entry(slug: BadgeSlug, points: i64, description: &str) -> Badge {
            Badge {
                slug,
                points,
                description: description.to_string(),
            }
        }

        Self::new(vec![
            entry(
                BadgeSlug::EcoReporter,
                50,
                "Submit your first waste report",
            ),
            entry(
                BadgeSlug::CommunityHelper,
                100,
                "Submit three waste reports",
            ),
            entry(BadgeSlug::QuizMaster, 75, "Ace the segregation quiz"),
            entry(
                BadgeSlug::WasteWizard,
                60,
                "Classify ten items with the waste scanner",
            ),
            entry(
                BadgeSlug::EcoCurious,
                25,
                "Ask the eco assistant your first question",
            ),
        ])
    }
}
