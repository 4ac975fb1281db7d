//! Pure transition planning.
//!
//! Given the current document and who is asking, these functions decide
//! whether a command is allowed and what to write. They do no I/O, so
//! every rule of the state machine can be tested without a store.
//!
//! | From | Command | Precondition |
//! |---|---|---|
//! | lobby | join | name non-empty |
//! | lobby | [`RoundCommand::ChangeCategory`] | host, known category |
//! | lobby, revealed | [`RoundCommand::Start`] | host, enough players |
//! | playing | [`RoundCommand::Reveal`] | host |
//! | revealed | [`RoundCommand::Reset`] | host |

use imposter_protocol::{Lobby, LobbyPatch, LobbyStatus, Player, PlayerId};

use crate::{GameConfig, Invalid, Picker, RoomError};

/// Host-only commands that mutate an existing lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundCommand {
    ChangeCategory(String),
    Start,
    Reveal,
    Reset,
}

impl RoundCommand {
    /// Verb used in logs and error messages.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ChangeCategory(_) => "change the category of",
            Self::Start => "start",
            Self::Reveal => "reveal",
            Self::Reset => "reset",
        }
    }

    /// Returns `true` if the command is legal in `status`.
    pub fn allowed_in(&self, status: LobbyStatus) -> bool {
        match self {
            Self::ChangeCategory(_) => status == LobbyStatus::Lobby,
            Self::Start => matches!(status, LobbyStatus::Lobby | LobbyStatus::Revealed),
            Self::Reveal => status == LobbyStatus::Playing,
            Self::Reset => status == LobbyStatus::Revealed,
        }
    }
}

/// Trims a display name and rejects it if nothing is left.
///
/// # Errors
/// [`RoomError::Validation`] for an empty or whitespace-only name.
pub fn validate_name(name: &str) -> Result<String, RoomError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RoomError::Validation(Invalid::EmptyName));
    }
    Ok(trimmed.to_string())
}

/// Decides what joining `lobby` means for `caller`.
///
/// Returns the player entry to append, or `None` when the caller is
/// already listed (re-joining is a no-op). Only the id is compared; a
/// different name under the same id keeps the original entry.
///
/// # Errors
/// [`RoomError::StateConflict`] unless the lobby is joinable.
pub fn plan_join(lobby: &Lobby, caller: &PlayerId, name: &str) -> Result<Option<Player>, RoomError> {
    if !lobby.status.is_joinable() {
        return Err(RoomError::StateConflict {
            code: lobby.code.clone(),
            status: lobby.status,
            action: "join",
        });
    }
    if lobby.contains(caller) {
        return Ok(None);
    }
    Ok(Some(Player::new(caller.clone(), name)))
}

/// Plans a host-only command.
///
/// Checks run in this order: lobby phase, host, command-specific
/// preconditions. `now_millis` becomes the round's start time.
///
/// # Errors
/// - [`RoomError::StateConflict`] if the command is illegal in the
///   current phase
/// - [`RoomError::NotHost`] if `caller` didn't create the lobby
/// - [`RoomError::NotEnoughPlayers`] when starting with too few players
/// - [`RoomError::Validation`] for an unknown category
pub fn plan(
    lobby: &Lobby,
    caller: &PlayerId,
    command: &RoundCommand,
    config: &GameConfig,
    picker: &dyn Picker,
    now_millis: u64,
) -> Result<LobbyPatch, RoomError> {
    if !command.allowed_in(lobby.status) {
        return Err(RoomError::StateConflict {
            code: lobby.code.clone(),
            status: lobby.status,
            action: command.action(),
        });
    }
    if !lobby.is_host(caller) {
        return Err(RoomError::NotHost(caller.clone()));
    }

    match command {
        RoundCommand::ChangeCategory(category) => {
            if !config.catalog.contains(category) {
                return Err(RoomError::Validation(Invalid::UnknownCategory(
                    category.clone(),
                )));
            }
            Ok(LobbyPatch::category(category.clone()))
        }
        RoundCommand::Start => plan_start(lobby, config, picker, now_millis),
        RoundCommand::Reveal => Ok(LobbyPatch::reveal()),
        RoundCommand::Reset => Ok(LobbyPatch::reset()),
    }
}

/// Draws the secret word, then the imposter, independently.
fn plan_start(
    lobby: &Lobby,
    config: &GameConfig,
    picker: &dyn Picker,
    now_millis: u64,
) -> Result<LobbyPatch, RoomError> {
    let have = lobby.players.len();
    let need = config.required_players();
    if have < need {
        return Err(RoomError::NotEnoughPlayers { have, need });
    }

    let words = config
        .catalog
        .words(&lobby.category)
        .filter(|w| !w.is_empty())
        .ok_or_else(|| RoomError::Validation(Invalid::UnknownCategory(lobby.category.clone())))?;

    let word = &words[picker.pick(words.len()).min(words.len() - 1)];
    let imposter = &lobby.players[picker.pick(have).min(have - 1)];

    Ok(LobbyPatch::start_round(word.clone(), imposter.id.clone(), now_millis))
}
