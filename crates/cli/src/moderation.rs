//! Keyword-blocklist moderator for the console.
//!
//! The production moderation collaborator is an external AI service; the
//! console stands in with a case-insensitive substring blocklist. Anything
//! that doesn't match passes.

use async_trait::async_trait;

use greenloop_engine::{ModerationError, ModerationService, ModerationVerdict};

pub struct BlocklistModeration {
    blocked: Vec<&'static str>,
}

impl Default for BlocklistModeration {
    fn default() -> Self {
        Self {
            blocked: vec!["spam", "scam", "idiot", "stupid", "hate"],
        }
    }
}

#[async_trait]
impl ModerationService for BlocklistModeration {
    async fn moderate(
        &self,
        text: &str,
        _locale: &str,
    ) -> Result<ModerationVerdict, ModerationError> {
        let lowered = text.to_lowercase();
        match self.blocked.iter().find(|term| lowered.contains(**term)) {
            Some(term) => Ok(ModerationVerdict::inappropriate(format!(
                "message contains a blocked term: \"{term}\""
            ))),
            None => Ok(ModerationVerdict::appropriate()),
        }
    }
}
