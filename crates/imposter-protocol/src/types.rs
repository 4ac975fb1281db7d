//! Core document types shared by every client.
//!
//! These are the structures that live in the store under a room code and
//! travel back to every subscriber as full snapshots. The JSON shape
//! (camelCase keys, lowercase status, empty string for "no imposter") is
//! what other clients of the same store expect, so the serde attributes
//! here are part of the contract.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque, stable identifier of one participant (one per device/session).
///
/// Handed out by the identity provider. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The 4-character public key of a lobby.
///
/// A `RoomCode` can only be built from characters of [`RoomCode::ALPHABET`],
/// so holding one means the code is well-formed. Deserialization goes
/// through the same check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Characters a code is drawn from: uppercase letters without `I` and
    /// `O`, digits without `0` and `1`.
    pub const ALPHABET: &'static str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    /// Number of characters in a code.
    pub const LENGTH: usize = 4;

    /// Parses user input into a room code.
    ///
    /// Surrounding whitespace is ignored and letters are upper-cased, so
    /// `" k7p2 "` parses as `K7P2`.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidRoomCode`] if the input is not exactly
    /// [`Self::LENGTH`] characters of [`Self::ALPHABET`].
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let normalized = input.trim().to_uppercase();
        let well_formed = normalized.chars().count() == Self::LENGTH
            && normalized.chars().all(|c| Self::ALPHABET.contains(c));
        if !well_formed {
            return Err(ProtocolError::InvalidRoomCode(input.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Builds a code from characters already known to be in the alphabet.
    ///
    /// # Errors
    /// Same as [`Self::parse`], without the normalization step.
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Result<Self, ProtocolError> {
        let raw: String = chars.into_iter().collect();
        if raw.chars().count() != Self::LENGTH || !raw.chars().all(|c| Self::ALPHABET.contains(c)) {
            return Err(ProtocolError::InvalidRoomCode(raw));
        }
        Ok(Self(raw))
    }

    /// Builds a code from positions in [`Self::ALPHABET`].
    ///
    /// Indices wrap around the alphabet length, so every input yields a
    /// valid code.
    pub fn from_indices(indices: [usize; Self::LENGTH]) -> Self {
        let alphabet = Self::ALPHABET.as_bytes();
        Self(
            indices
                .iter()
                .map(|&i| alphabet[i % alphabet.len()] as char)
                .collect(),
        )
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_chars(value.chars())
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// LobbyStatus
// ---------------------------------------------------------------------------

/// Phase of a lobby.
///
/// ```text
///            StartGame               Reveal
///   Lobby ─────────────→ Playing ─────────────→ Revealed
///     ↑                     ↑                      │
///     │                     └──── StartGame ───────┤
///     └──────────────────── ResetGame ─────────────┘
/// ```
///
/// There is no terminal state; a lobby lives until its document is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LobbyStatus {
    /// Waiting room. Players can join, the host can pick a category.
    #[default]
    Lobby,
    /// A round is running; every player knows their own role.
    Playing,
    /// The imposter and the secret word are shown to everyone.
    Revealed,
}

impl LobbyStatus {
    /// Returns `true` if new players may join.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if a secret word and an imposter are assigned.
    pub fn has_round(self) -> bool {
        matches!(self, Self::Playing | Self::Revealed)
    }
}

impl fmt::Display for LobbyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Playing => write!(f, "playing"),
            Self::Revealed => write!(f, "revealed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One entry of a lobby's player list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Initialized to 0; nothing updates it yet.
    #[serde(default)]
    pub score: i64,
}

impl Player {
    /// Creates a player entry with a zero score.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// What one player is told during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// This player has no word and must bluff.
    Imposter,
    /// This player knows the secret word.
    Word { word: String, category: String },
}

impl Role {
    pub fn is_imposter(&self) -> bool {
        matches!(self, Self::Imposter)
    }
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// The shared document representing one game room's full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    /// Immutable after creation.
    pub code: RoomCode,
    /// The creator. Immutable after creation.
    pub host_id: PlayerId,
    pub status: LobbyStatus,
    /// Key into the word catalog.
    pub category: String,
    /// Empty unless a round is assigned.
    #[serde(default)]
    pub secret_word: String,
    /// Stored as `""` when unset.
    #[serde(default, with = "empty_as_none")]
    pub imposter_id: Option<PlayerId>,
    /// Epoch milliseconds of the last transition into `playing`.
    #[serde(default)]
    pub start_time: Option<u64>,
    /// Ordered by join time.
    pub players: Vec<Player>,
}

impl Lobby {
    /// Creates a fresh lobby with the host as its only player.
    pub fn new(code: RoomCode, host: Player, category: impl Into<String>) -> Self {
        Self {
            code,
            host_id: host.id.clone(),
            status: LobbyStatus::Lobby,
            category: category.into(),
            secret_word: String::new(),
            imposter_id: None,
            start_time: None,
            players: vec![host],
        }
    }

    /// Returns `true` if `id` is the lobby's host.
    pub fn is_host(&self, id: &PlayerId) -> bool {
        self.host_id == *id
    }

    /// Returns `true` if a player with this id is in the player list.
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| p.id == *id)
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// The player currently assigned as imposter, if any is assigned and
    /// still in the list.
    pub fn imposter(&self) -> Option<&Player> {
        self.imposter_id.as_ref().and_then(|id| self.player(id))
    }

    /// Computes the role `id` sees this round.
    ///
    /// Returns `None` when no round is assigned. Only meant to be called
    /// with the caller's own id.
    pub fn role_of(&self, id: &PlayerId) -> Option<Role> {
        if !self.status.has_round() {
            return None;
        }
        if self.imposter_id.as_ref() == Some(id) {
            Some(Role::Imposter)
        } else {
            Some(Role::Word {
                word: self.secret_word.clone(),
                category: self.category.clone(),
            })
        }
    }

    /// Checks the document-level invariants.
    ///
    /// - at least one player, no duplicate ids
    /// - the host is in the player list
    /// - `secret_word` is non-empty iff a round is assigned
    /// - `imposter_id` is set iff a round is assigned, and names a player
    /// - `start_time` is set iff a round is assigned
    ///
    /// # Errors
    /// [`ProtocolError::InvariantViolation`] naming the first broken rule.
    pub fn check_invariants(&self) -> Result<(), ProtocolError> {
        let violation = |msg: String| Err(ProtocolError::InvariantViolation(msg));

        if self.players.is_empty() {
            return violation(format!("lobby {} has no players", self.code));
        }
        for (i, p) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|q| q.id == p.id) {
                return violation(format!("player {} listed twice", p.id));
            }
        }
        if !self.contains(&self.host_id) {
            return violation(format!("host {} is not a player", self.host_id));
        }

        let has_round = self.status.has_round();
        if has_round == self.secret_word.is_empty() {
            return violation(format!(
                "secret word {:?} does not match status {}",
                self.secret_word, self.status
            ));
        }
        match (&self.imposter_id, has_round) {
            (Some(id), true) if !self.contains(id) => {
                return violation(format!("imposter {id} is not a player"));
            }
            (Some(_), false) | (None, true) => {
                return violation(format!(
                    "imposter assignment does not match status {}",
                    self.status
                ));
            }
            _ => {}
        }
        if has_round != self.start_time.is_some() {
            return violation(format!(
                "start time does not match status {}",
                self.status
            ));
        }
        Ok(())
    }
}

/// Stores `Option<PlayerId>` as a plain string, `""` meaning `None`.
mod empty_as_none {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<PlayerId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map_or("", PlayerId::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PlayerId>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok((!raw.is_empty()).then_some(PlayerId(raw)))
    }
}
