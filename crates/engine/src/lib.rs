//! The Greenloop domain/state engine.
//!
//! A single [`Session`] is the authoritative holder of all mutable entities
//! (reports, buildings, vehicles, pickups, communities, badges) and the rules
//! governing how user actions transform them. It behaves like a small
//! application server inside one process: commands validate, mutate the
//! entity collections, trigger badge/point side effects, and write through to
//! the persistence gateway, all on a single logical thread of control.
//!
//! # Modules
//!
//! - [`store`]: the [`EntityStore`] owning every collection plus the profile
//! - [`badges`]: points, one-time badge unlocks, report-count triggers
//! - [`compliance`]: report lifecycle and building warnings/penalties
//! - [`dispatch`]: the vehicle-assignment simulator with cancellable timers
//! - [`community`]: communities, membership, moderation-gated messaging
//! - [`marketplace`]: consumer pickups, B2B bulk pickups, equipment requests
//! - [`snapshot`]: lenient per-key load and write-through save
//! - [`session`]: the command surface tying everything together
//!
//! The only asynchronous boundaries are the moderation call in
//! `send_message`, the two delayed dispatch transitions, and gateway I/O;
//! everything else executes to completion before the next command.

pub mod badges;
pub mod community;
pub mod compliance;
pub mod dispatch;
pub mod marketplace;
pub mod session;
pub mod snapshot;
pub mod store;

pub use community::{
    ModerationError, ModerationService, ModerationVerdict, SendOutcome, StaticModeration,
    MODERATION_UNAVAILABLE,
};
pub use dispatch::DispatchTiming;
pub use session::{Session, SessionConfig};
pub use store::{CommandEffect, EntityStore};

/// Errors surfaced by engine commands.
///
/// Expected negative outcomes are not here: a rejected message is a
/// [`SendOutcome::Rejected`], and an unknown entity id is a logged no-op.
/// An `EngineError` means the command could not complete at all.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The persistence gateway failed to read or write.
    #[error("persistence gateway: {0}")]
    Storage(#[from] greenloop_storage::StorageError),

    /// A collection could not be serialized for its snapshot key.
    #[error("snapshot encoding for '{key}': {source}")]
    Snapshot {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
