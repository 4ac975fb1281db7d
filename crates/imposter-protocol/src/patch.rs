//! Partial updates to a lobby document.
//!
//! The store merges a [`LobbyPatch`] into the stored document atomically:
//! fields left as `None` are untouched, fields set to `Some(..)` are
//! overwritten. Clearing an optional document field is expressed as
//! `Some(None)`.

use crate::{Lobby, LobbyStatus, PlayerId};

/// A set of field writes to merge into an existing [`Lobby`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LobbyPatch {
    pub status: Option<LobbyStatus>,
    pub category: Option<String>,
    pub secret_word: Option<String>,
    pub imposter_id: Option<Option<PlayerId>>,
    pub start_time: Option<Option<u64>>,
}

impl LobbyPatch {
    /// Enter `playing` with a freshly drawn word and imposter.
    pub fn start_round(secret_word: impl Into<String>, imposter: PlayerId, started_at: u64) -> Self {
        Self {
            status: Some(LobbyStatus::Playing),
            secret_word: Some(secret_word.into()),
            imposter_id: Some(Some(imposter)),
            start_time: Some(Some(started_at)),
            ..Self::default()
        }
    }

    /// Enter `revealed`, keeping word and imposter.
    pub fn reveal() -> Self {
        Self {
            status: Some(LobbyStatus::Revealed),
            ..Self::default()
        }
    }

    /// Back to `lobby` with every round field cleared.
    pub fn reset() -> Self {
        Self {
            status: Some(LobbyStatus::Lobby),
            secret_word: Some(String::new()),
            imposter_id: Some(None),
            start_time: Some(None),
            ..Self::default()
        }
    }

    /// Switch the word category.
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the set fields into `lobby`.
    pub fn apply(&self, lobby: &mut Lobby) {
        if let Some(status) = self.status {
            lobby.status = status;
        }
        if let Some(category) = &self.category {
            lobby.category.clone_from(category);
        }
        if let Some(word) = &self.secret_word {
            lobby.secret_word.clone_from(word);
        }
        if let Some(imposter) = &self.imposter_id {
            lobby.imposter_id.clone_from(imposter);
        }
        if let Some(start) = self.start_time {
            lobby.start_time = start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, RoomCode};

    fn lobby() -> Lobby {
        let mut lobby = Lobby::new(
            RoomCode::parse("K7P2").unwrap(),
            Player::new(PlayerId::new("u1"), "Ana"),
            "Tiere",
        );
        lobby.players.push(Player::new(PlayerId::new("u2"), "Ben"));
        lobby
    }

    #[test]
    fn test_default_patch_is_empty_and_changes_nothing() {
        let patch = LobbyPatch::default();
        assert!(patch.is_empty());
        let mut l = lobby();
        patch.apply(&mut l);
        assert_eq!(l, lobby());
    }

    #[test]
    fn test_start_then_reset_restores_round_fields() {
        let mut l = lobby();
        LobbyPatch::start_round("Hai", PlayerId::new("u2"), 42).apply(&mut l);
        assert_eq!(l.status, LobbyStatus::Playing);
        assert_eq!(l.secret_word, "Hai");
        assert_eq!(l.imposter_id, Some(PlayerId::new("u2")));
        assert_eq!(l.start_time, Some(42));
        l.check_invariants().unwrap();

        LobbyPatch::reset().apply(&mut l);
        assert_eq!(l, lobby());
    }

    #[test]
    fn test_reveal_keeps_word_and_imposter() {
        let mut l = lobby();
        LobbyPatch::start_round("Hai", PlayerId::new("u1"), 7).apply(&mut l);
        LobbyPatch::reveal().apply(&mut l);
        assert_eq!(l.status, LobbyStatus::Revealed);
        assert_eq!(l.secret_word, "Hai");
        assert_eq!(l.imposter_id, Some(PlayerId::new("u1")));
    }

    #[test]
    fn test_category_patch_touches_only_category() {
        let mut l = lobby();
        LobbyPatch::category("Essen").apply(&mut l);
        assert_eq!(l.category, "Essen");
        assert_eq!(l.players.len(), 2);
        assert_eq!(l.status, LobbyStatus::Lobby);
    }
}
