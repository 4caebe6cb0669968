//! Persistence gateway for Greenloop sessions.
//!
//! The engine survives restarts through a deliberately narrow seam: a
//! string-keyed, string-valued store with `get` and `put`. Each entity
//! collection is serialized under its own well-known key (see [`keys`]),
//! so a backend never needs to understand the domain. Two backends ship
//! here: an in-memory map for tests and ephemeral sessions, and a
//! single-file JSON store for the CLI.

pub mod conformance;
mod error;
mod file;
pub mod keys;
mod memory;
mod traits;

pub use error::StorageError;
pub use file::JsonFileGateway;
pub use memory::MemoryGateway;
pub use traits::PersistenceGateway;
