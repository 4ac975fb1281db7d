//! Game configuration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Catalog, Invalid, RoomError};

/// Fewest players a round can ever start with.
pub const MIN_PLAYERS: usize = 3;

/// Settings shared by every lobby a client creates or joins.
#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    /// Players required before the host may start a round. Never below
    /// [`MIN_PLAYERS`]; see [`required_players`](Self::required_players).
    pub min_players: usize,

    /// Categories and words rounds are drawn from.
    pub catalog: Catalog,
}

#[derive(Deserialize)]
struct RawGameConfig {
    min_players: usize,
    catalog: Catalog,
}

impl GameConfig {
    /// # Errors
    /// [`RoomError::Validation`] if `min_players` is below [`MIN_PLAYERS`].
    pub fn new(min_players: usize, catalog: Catalog) -> Result<Self, RoomError> {
        if min_players < MIN_PLAYERS {
            return Err(RoomError::Validation(Invalid::MinPlayers(min_players)));
        }
        Ok(Self {
            min_players,
            catalog,
        })
    }

    /// Player count a round needs: `min_players`, clamped to
    /// [`MIN_PLAYERS`].
    pub fn required_players(&self) -> usize {
        self.min_players.max(MIN_PLAYERS)
    }
}

impl<'de> Deserialize<'de> for GameConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawGameConfig::deserialize(deserializer)?;
        Self::new(raw.min_players, raw.catalog).map_err(serde::de::Error::custom)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            catalog: Catalog::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.min_players, 3);
        assert_eq!(config.required_players(), 3);
        assert_eq!(config.catalog.default_category(), "Tiere");
    }

    #[test]
    fn test_new_rejects_too_few_players() {
        for n in [0, 1, 2] {
            assert!(matches!(
                GameConfig::new(n, Catalog::builtin()),
                Err(RoomError::Validation(Invalid::MinPlayers(m))) if m == n
            ));
        }
        assert_eq!(GameConfig::new(5, Catalog::builtin()).unwrap().required_players(), 5);
    }

    #[test]
    fn test_deserialization_rejects_too_few_players() {
        let catalog = r#"[{"name":"Farben","words":["Rot"]}]"#;
        let low = format!(r#"{{"min_players":0,"catalog":{catalog}}}"#);
        assert!(serde_json::from_str::<GameConfig>(&low).is_err());

        let ok = format!(r#"{{"min_players":4,"catalog":{catalog}}}"#);
        let config: GameConfig = serde_json::from_str(&ok).unwrap();
        assert_eq!(config.min_players, 4);
    }

    #[test]
    fn test_required_players_clamps_a_lowered_field() {
        let mut config = GameConfig::default();
        config.min_players = 0;
        assert_eq!(config.required_players(), MIN_PLAYERS);
    }
}
