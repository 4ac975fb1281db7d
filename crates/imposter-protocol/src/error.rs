//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
///
/// Covers (de)serialization of lobby documents and validation of values
/// that come from outside the process: user-typed room codes and
/// documents read back from the store.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a document into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a document).
    ///
    /// Common causes: malformed JSON, missing fields, or a room code in
    /// the document that is not drawn from the code alphabet.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code was not exactly four characters of the code alphabet.
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),

    /// A decoded document breaks one of the lobby invariants.
    #[error("lobby invariant violated: {0}")]
    InvariantViolation(String),
}
