//! What a client should show, derived from its local state.
//!
//! [`ClientView::project`] is a pure function: it reads the client and
//! never changes it. Rendering (terminal, web, tests) matches on the
//! result.

use imposter_protocol::{LobbyStatus, Role, RoomCode};
use imposter_session::{IdentityState, SessionError};
use imposter_store::LobbyStore;
use imposter_tick::format_elapsed;

use crate::{GameClient, ImposterError};

/// Shown when the imposter is no longer in the player list.
pub const UNKNOWN_PLAYER: &str = "Unbekannt";

/// One row of the waiting-room player list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub name: String,
    /// Upper-cased first letter of the name, for the avatar.
    pub initial: Option<char>,
    pub is_host: bool,
    /// This row is the viewing client.
    pub is_you: bool,
}

/// One screen's worth of state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientView {
    /// Signing in, or waiting for the first snapshot of a room.
    Loading,
    /// Sign-in failed. Blocks the whole client until it is rebuilt.
    SignInFailed {
        message: String,
    },
    Landing {
        name: String,
        error: Option<String>,
    },
    Lobby {
        code: RoomCode,
        players: Vec<PlayerRow>,
        category: String,
        /// Categories the host can pick from, in display order.
        categories: Vec<String>,
        is_host: bool,
        can_start: bool,
        /// Player minimum, shown while `can_start` is false.
        min_players: usize,
        error: Option<String>,
    },
    Playing {
        /// `M:SS`.
        elapsed: String,
        /// This client's role; `None` while hidden.
        role: Option<Role>,
        is_host: bool,
        error: Option<String>,
    },
    Revealed {
        imposter_name: String,
        secret_word: String,
        is_host: bool,
        error: Option<String>,
    },
}

impl ClientView {
    pub fn project<S: LobbyStore>(client: &GameClient<S>) -> Self {
        let Some(me) = client.player_id() else {
            return match client.identity_state() {
                IdentityState::Failed(reason) => Self::SignInFailed {
                    message: ImposterError::from(SessionError::IdentityFailed(reason))
                        .user_message(),
                },
                _ => Self::Loading,
            };
        };
        let error = client.error().map(str::to_string);

        if client.room_code().is_none() {
            return Self::Landing {
                name: client.name().to_string(),
                error,
            };
        }
        let Some(lobby) = client.lobby() else {
            return Self::Loading;
        };
        let is_host = lobby.is_host(&me);

        match lobby.status {
            LobbyStatus::Lobby => {
                let config = client.context().rooms().config();
                Self::Lobby {
                    code: lobby.code.clone(),
                    players: lobby
                        .players
                        .iter()
                        .map(|p| PlayerRow {
                            name: p.name.clone(),
                            initial: p.name.chars().next().and_then(|c| c.to_uppercase().next()),
                            is_host: lobby.is_host(&p.id),
                            is_you: p.id == me,
                        })
                        .collect(),
                    category: lobby.category.clone(),
                    categories: config.catalog.categories().map(str::to_string).collect(),
                    is_host,
                    can_start: is_host && lobby.players.len() >= config.required_players(),
                    min_players: config.required_players(),
                    error,
                }
            }
            LobbyStatus::Playing => Self::Playing {
                elapsed: format_elapsed(client.elapsed()),
                role: client
                    .is_role_visible()
                    .then(|| lobby.role_of(&me))
                    .flatten(),
                is_host,
                error,
            },
            LobbyStatus::Revealed => Self::Revealed {
                imposter_name: lobby
                    .imposter()
                    .map_or_else(|| UNKNOWN_PLAYER.to_string(), |p| p.name.clone()),
                secret_word: lobby.secret_word.clone(),
                is_host,
                error,
            },
        }
    }
}
