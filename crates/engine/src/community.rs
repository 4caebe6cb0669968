//! Community messaging: creation, membership, and moderated messages.
//!
//! Every outgoing message crosses an asynchronous boundary to the
//! [`ModerationService`] before anything is stored. A negative verdict is
//! an expected outcome ([`SendOutcome::Rejected`]), not an error, and
//! performs no mutation. A moderation transport failure is fail-closed:
//! the message is rejected rather than stored unreviewed.

use async_trait::async_trait;
use time::OffsetDateTime;

use greenloop_core::{Community, CommunityMember, CommunityMessage};

use crate::store::{fresh_id, CommandEffect, EntityStore};

/// Reason reported when the moderation service cannot be reached.
pub const MODERATION_UNAVAILABLE: &str = "content review unavailable";

/// Verdict from the content-safety check.
#[derive(Debug, Clone)]
pub struct ModerationVerdict {
    pub is_appropriate: bool,
    pub reason: Option<String>,
}

impl ModerationVerdict {
    pub fn appropriate() -> Self {
        Self {
            is_appropriate: true,
            reason: None,
        }
    }

    pub fn inappropriate(reason: impl Into<String>) -> Self {
        Self {
            is_appropriate: false,
            reason: Some(reason.into()),
        }
    }
}

/// The moderation call itself failed (timeout, transport, provider error).
///
/// Distinct from a negative verdict; the engine maps this to a fail-closed
/// rejection.
#[derive(Debug, thiserror::Error)]
#[error("moderation service: {0}")]
pub struct ModerationError(pub String);

/// External content-safety collaborator gating community messages.
#[async_trait]
pub trait ModerationService: Send + Sync + 'static {
    /// Review `text` for the given locale.
    async fn moderate(&self, text: &str, locale: &str)
        -> Result<ModerationVerdict, ModerationError>;
}

/// Moderator returning a fixed outcome. For tests and ephemeral sessions.
#[derive(Debug, Clone)]
pub enum StaticModeration {
    AllowAll,
    DenyAll { reason: String },
    Unavailable,
}

#[async_trait]
impl ModerationService for StaticModeration {
    async fn moderate(
        &self,
        _text: &str,
        _locale: &str,
    ) -> Result<ModerationVerdict, ModerationError> {
        match self {
            StaticModeration::AllowAll => Ok(ModerationVerdict::appropriate()),
            StaticModeration::DenyAll { reason } => {
                Ok(ModerationVerdict::inappropriate(reason.clone()))
            }
            StaticModeration::Unavailable => {
                Err(ModerationError("simulated outage".to_string()))
            }
        }
    }
}

/// Outcome of a `send_message` command.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    Sent(CommunityMessage),
    /// Moderation declined the message; nothing was stored.
    Rejected { reason: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent(_))
    }
}

impl EntityStore {
    /// Create a community and enroll the creator.
    ///
    /// The display name is `"{name} ({area})"`. The creator joins in the
    /// same command, so a fresh community always has one member.
    pub fn create_community(
        &mut self,
        name: &str,
        description: &str,
        area: &str,
        creator_id: &str,
    ) -> Community {
        let community = Community {
            id: fresh_id("comm-"),
            name: format!("{name} ({area})"),
            description: description.to_string(),
            created_by: creator_id.to_string(),
        };
        self.communities.insert(0, community.clone());
        self.join_community(&community.id, creator_id);
        community
    }

    /// Add the user to a community roster, once.
    ///
    /// Membership is checked by user id; a second join is a no-op. Joining
    /// an id with no roster entry creates the entry, even for a community
    /// the store has never seen.
    pub fn join_community(&mut self, community_id: &str, user_id: &str) -> CommandEffect {
        let user_name = self.profile.name.clone();
        let members = self
            .community_members
            .entry(community_id.to_string())
            .or_default();
        if members.iter().any(|m| m.user_id == user_id) {
            return CommandEffect::NoOp;
        }
        members.push(CommunityMember {
            user_id: user_id.to_string(),
            user_name,
        });
        CommandEffect::Applied
    }

    /// Append an already-moderated message to a community's board.
    pub(crate) fn append_message(
        &mut self,
        community_id: &str,
        sender_id: &str,
        text: &str,
        now: OffsetDateTime,
    ) -> CommunityMessage {
        let message = CommunityMessage {
            id: fresh_id("msg-"),
            community_id: community_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_name: self.profile.name.clone(),
            text: text.to_string(),
            timestamp: now,
        };
        self.community_messages
            .entry(community_id.to_string())
            .or_default()
            .push(message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn creator_is_enrolled_at_creation() {
        let mut store = EntityStore::new();
        let community = store.create_community("Green", "desc", "Downtown", "user-001");

        assert_eq!(community.name, "Green (Downtown)");
        assert_eq!(community.created_by, "user-001");
        let members = &store.community_members[&community.id];
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, "user-001");
        assert_eq!(members[0].user_name, "Eco-Warrior");
    }

    #[test]
    fn joining_twice_adds_one_roster_entry() {
        let mut store = EntityStore::new();
        let community = store.create_community("Green", "desc", "Downtown", "user-001");

        assert!(!store.join_community(&community.id, "user-001").is_applied());
        assert!(store.join_community(&community.id, "user-002").is_applied());
        assert_eq!(store.community_members[&community.id].len(), 2);
    }

    #[test]
    fn joining_an_unknown_community_creates_the_roster() {
        let mut store = EntityStore::new();
        assert!(store.join_community("comm-ghost", "user-001").is_applied());
        assert_eq!(store.community_members["comm-ghost"].len(), 1);
    }

    #[test]
    fn messages_append_in_order() {
        let mut store = EntityStore::new();
        let now = datetime!(2024-06-01 10:00 UTC);
        store.append_message("comm-1", "user-001", "first", now);
        store.append_message("comm-1", "user-001", "second", now);
        let board = &store.community_messages["comm-1"];
        assert_eq!(board[0].text, "first");
        assert_eq!(board[1].text, "second");
    }
}
