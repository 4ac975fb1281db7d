//! Shared document model for Imposter.
//!
//! Every client reads and writes the same lobby document, so this crate is
//! the "language" the clients speak with each other through the store:
//!
//! - **Types** ([`Lobby`], [`Player`], [`LobbyStatus`], [`RoomCode`],
//!   [`PlayerId`]): the document and its identifiers.
//! - **Patches** ([`LobbyPatch`]): partial field updates merged atomically
//!   by the store.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how documents are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Store (bytes) → Protocol (Lobby) → Room (state machine)
//! ```

mod codec;
mod error;
mod patch;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use patch::LobbyPatch;
pub use types::{Lobby, LobbyStatus, Player, PlayerId, Role, RoomCode};
