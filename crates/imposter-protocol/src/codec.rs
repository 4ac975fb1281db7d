//! Codec trait and implementations for serializing lobby documents.
//!
//! The store keeps documents as bytes and hands decoded snapshots to
//! subscribers. The protocol layer doesn't care HOW documents are
//! serialized; it just needs something that implements [`Codec`].

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because a codec is owned by a store that is
/// shared between tasks for the lifetime of a client.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is the format hosted document stores speak, so it is also what
/// the in-memory store persists.
///
/// ## Example
///
/// ```rust
/// use imposter_protocol::{Codec, JsonCodec, Lobby, Player, PlayerId, RoomCode};
///
/// let codec = JsonCodec;
/// let lobby = Lobby::new(
///     RoomCode::parse("K7P2").unwrap(),
///     Player::new(PlayerId::new("u1"), "Ana"),
///     "Tiere",
/// );
///
/// let bytes = codec.encode(&lobby).unwrap();
/// let decoded: Lobby = codec.decode(&bytes).unwrap();
/// assert_eq!(lobby, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
