//! Unified error type for the Imposter client.

use imposter_protocol::ProtocolError;
use imposter_room::{Invalid, RoomError};
use imposter_session::SessionError;
use imposter_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert errors from
/// the lower layers without ceremony.
#[derive(Debug, thiserror::Error)]
pub enum ImposterError {
    /// Document encoding or a broken invariant.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The store itself failed outside a lobby command (subscribing).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Sign-in or local preferences.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A lobby command was refused or failed.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A room command was issued while the client isn't in a room.
    #[error("not in a room")]
    NotInRoom,
}

impl ImposterError {
    /// Returns `true` for failures of the store rather than of the
    /// request.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Room(RoomError::Store(_)))
    }

    /// The inline message shown to the player.
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(SessionError::IdentityFailed(_) | SessionError::IdentityUnavailable) => {
                "Fehler bei der Anmeldung. Bitte lade die Seite neu.".into()
            }
            Self::Session(_) => "Dein Name konnte nicht gespeichert werden.".into(),
            Self::Room(err) => room_message(err),
            Self::Store(err) => store_message(err),
            Self::Protocol(_) => "Der Raum enthält ungültige Daten.".into(),
            Self::NotInRoom => "Du bist in keinem Raum.".into(),
        }
    }
}

fn room_message(err: &RoomError) -> String {
    match err {
        RoomError::Validation(Invalid::EmptyName) => "Bitte gib einen Namen ein.".into(),
        RoomError::Validation(Invalid::RoomCode(_)) => "Ungültiger Code.".into(),
        RoomError::Validation(Invalid::UnknownCategory(_) | Invalid::Catalog(_)) => {
            "Unbekannte Kategorie.".into()
        }
        RoomError::Validation(Invalid::MinPlayers(_)) => "Ungültige Spieleinstellungen.".into(),
        RoomError::NotFound(_) => "Raum nicht gefunden.".into(),
        RoomError::StateConflict { action: "join", .. } => "Spiel läuft bereits.".into(),
        RoomError::StateConflict { .. } => "Das geht im aktuellen Spielstand nicht.".into(),
        RoomError::NotHost(_) => "Nur der Host kann das Spiel steuern.".into(),
        RoomError::NotEnoughPlayers { need, .. } => format!("Mindestens {need} Spieler benötigt"),
        RoomError::Store(err) => store_message(err),
        RoomError::RoomClosed(_) => "Der Raum wurde geschlossen.".into(),
    }
}

fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::FeedLost(_) => "Verbindung zum Raum verloren.".into(),
        StoreError::Missing(_) => "Der Raum wurde geschlossen.".into(),
        StoreError::Unavailable(_) | StoreError::Corrupt(_) => {
            "Keine Verbindung. Bitte versuche es erneut.".into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imposter_protocol::{LobbyStatus, PlayerId, RoomCode};

    fn code() -> RoomCode {
        RoomCode::parse("K7P2").unwrap()
    }

    #[test]
    fn test_from_room_error() {
        let err: ImposterError = RoomError::NotFound(code()).into();
        assert!(matches!(err, ImposterError::Room(_)));
        assert_eq!(err.to_string(), "room K7P2 not found");
        assert_eq!(err.user_message(), "Raum nicht gefunden.");
    }

    #[test]
    fn test_from_session_error() {
        let err: ImposterError = SessionError::IdentityFailed("disabled".into()).into();
        assert_eq!(
            err.user_message(),
            "Fehler bei der Anmeldung. Bitte lade die Seite neu."
        );
    }

    #[test]
    fn test_validation_messages_distinguish_name_and_code() {
        let name: ImposterError = RoomError::Validation(Invalid::EmptyName).into();
        let code: ImposterError = RoomError::Validation(Invalid::RoomCode("AB".into())).into();
        assert_eq!(name.user_message(), "Bitte gib einen Namen ein.");
        assert_eq!(code.user_message(), "Ungültiger Code.");

        let config: ImposterError = RoomError::Validation(Invalid::MinPlayers(0)).into();
        assert_eq!(config.user_message(), "Ungültige Spieleinstellungen.");
    }

    #[test]
    fn test_join_conflict_reads_as_game_running() {
        let err: ImposterError = RoomError::StateConflict {
            code: code(),
            status: LobbyStatus::Playing,
            action: "join",
        }
        .into();
        assert_eq!(err.user_message(), "Spiel läuft bereits.");
    }

    #[test]
    fn test_store_failures_are_flagged() {
        let wrapped: ImposterError = RoomError::Store(StoreError::Unavailable("offline".into())).into();
        let direct: ImposterError = StoreError::FeedLost("reset".into()).into();
        let refused: ImposterError = RoomError::NotHost(PlayerId::new("u2")).into();

        assert!(wrapped.is_store_failure());
        assert!(direct.is_store_failure());
        assert!(!refused.is_store_failure());
        assert_eq!(direct.user_message(), "Verbindung zum Raum verloren.");
    }

    #[test]
    fn test_player_minimum_in_message() {
        let err: ImposterError = RoomError::NotEnoughPlayers { have: 2, need: 3 }.into();
        assert_eq!(err.user_message(), "Mindestens 3 Spieler benötigt");
    }
}
