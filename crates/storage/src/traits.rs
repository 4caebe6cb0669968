use async_trait::async_trait;

use crate::error::StorageError;

/// The key-value seam between a Greenloop session and durable storage.
///
/// A `PersistenceGateway` stores opaque serialized strings under well-known
/// keys (see [`crate::keys`]). The session writes through the gateway
/// immediately after every successful mutation and reads every key once at
/// start; there is no transaction or batching layer because a session is
/// the only writer.
///
/// ## Contract
///
/// - `get` of a key never written returns `Ok(None)`; it must not create
///   the key.
/// - `put` overwrites unconditionally and must be durable by the time it
///   returns (for backends with a durability notion).
/// - Values round-trip byte-for-byte: the gateway never inspects, trims,
///   or re-encodes them.
///
/// Implementations must be `Send + Sync + 'static` so a gateway handle can
/// be shared with scheduled dispatch tasks.
#[async_trait]
pub trait PersistenceGateway: Send + Sync + 'static {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
