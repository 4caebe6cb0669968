use serde::{Deserialize, Serialize};

/// The identities a session acts under.
///
/// Commands never assume a fixed caller; the session is constructed with an
/// explicit identity and threads it through every command. Citizen-facing
/// commands (reports, communities, pickups) act as `user_id`; B2B commands
/// act as `business_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub business_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, business_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            business_id: business_id.into(),
        }
    }
}
