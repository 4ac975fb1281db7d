use imposter_protocol::{ProtocolError, RoomCode};

/// Errors that can occur in the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (network down, backend rejected
    /// the request).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An update targeted a document that does not exist.
    #[error("no lobby stored under {0}")]
    Missing(RoomCode),

    /// A stored document could not be encoded or decoded.
    #[error("corrupt lobby document: {0}")]
    Corrupt(#[from] ProtocolError),

    /// A subscription's change feed broke.
    #[error("change feed lost: {0}")]
    FeedLost(String),
}
