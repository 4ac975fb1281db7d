//! Error types for the room layer.

use imposter_protocol::{LobbyStatus, PlayerId, RoomCode};
use imposter_store::StoreError;

/// What was wrong with rejected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Invalid {
    #[error("name must not be empty")]
    EmptyName,

    #[error("malformed room code {0:?}")]
    RoomCode(String),

    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    /// A catalog that can't serve draws (no categories, empty word list,
    /// repeated name).
    #[error("bad catalog: {0}")]
    Catalog(String),

    /// A player minimum below the game's floor of three.
    #[error("a round needs at least 3 players, not {0}")]
    MinPlayers(usize),
}

/// Errors that can occur while driving a lobby.
///
/// Every variant is reported to the caller of the command that caused
/// it; none of them is fatal to the client.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Bad input caught before any store call.
    #[error("invalid input: {0}")]
    Validation(Invalid),

    /// No lobby exists under this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The lobby is in a phase that doesn't allow this command.
    /// For example, joining a room whose round is already running.
    #[error("cannot {action} room {code} while it is {status}")]
    StateConflict {
        code: RoomCode,
        status: LobbyStatus,
        action: &'static str,
    },

    /// A host-only command was issued by someone else.
    #[error("player {0} is not the host")]
    NotHost(PlayerId),

    /// Too few players to start a round.
    #[error("need at least {need} players to start, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    /// The store rejected or failed the write or read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The lobby document disappeared while this client was in it.
    #[error("room {0} was closed")]
    RoomClosed(RoomCode),
}
