//! Neighborhood communities, their member rosters, and message boards.
//!
//! Rosters and message lists are not embedded in the community record; they
//! live in maps keyed by community id so each collection can be persisted
//! under its own snapshot key.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    /// Display name, formatted as `"{name} ({area})"` at creation.
    pub name: String,
    pub description: String,
    pub created_by: String,
}

/// Roster entry; the display name is captured at join time and not updated
/// when the user later renames themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMessage {
    pub id: String,
    pub community_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    /// ISO 8601 / RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
