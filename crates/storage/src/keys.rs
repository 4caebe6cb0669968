//! Well-known snapshot keys.
//!
//! One key per persisted collection. Vehicles, equipment requests, points,
//! and unlocked badges are intentionally absent: they are session-scoped
//! and rebuilt on every start.

/// Activity history: JSON array of history items, newest first.
pub const APP_HISTORY: &str = "appHistory";
/// Profile display name, stored as a plain string.
pub const USER_NAME: &str = "userName";
/// Profile assigned building id, stored as a plain string ("" when unset).
pub const BUILDING_ID: &str = "buildingId";
/// JSON array of communities.
pub const COMMUNITIES: &str = "communities";
/// JSON object mapping community id to its member roster.
pub const COMMUNITY_MEMBERS: &str = "communityMembers";
/// JSON object mapping community id to its ordered message list.
pub const COMMUNITY_MESSAGES: &str = "communityMessages";
/// JSON array of buildings with their warnings and penalties.
pub const BUILDINGS: &str = "buildings";
/// JSON array of consumer pickup requests, newest first.
pub const PICKUP_REQUESTS: &str = "pickupRequests";
/// JSON array of B2B bulk pickup requests, newest first.
pub const BULK_PICKUP_REQUESTS: &str = "bulkPickupRequests";

/// Every key a session reads at start and may write during its lifetime.
pub const ALL: [&str; 9] = [
    APP_HISTORY,
    USER_NAME,
    BUILDING_ID,
    COMMUNITIES,
    COMMUNITY_MEMBERS,
    COMMUNITY_MESSAGES,
    BUILDINGS,
    PICKUP_REQUESTS,
    BULK_PICKUP_REQUESTS,
];
