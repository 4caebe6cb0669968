/// All errors that can be returned by a `PersistenceGateway` implementation.
///
/// Malformed *values* are not an error at this layer: the gateway hands back
/// whatever string was stored and the session performs its own lenient
/// decoding. Errors here mean the backend itself failed to read or write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O failure while reading or writing the underlying store.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend-specific failure (lock poisoning, encoding of the store
    /// document, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
