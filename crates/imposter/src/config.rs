//! Client configuration.

use std::env;
use std::path::PathBuf;

use imposter_room::GameConfig;
use imposter_tick::TimerConfig;
use serde::{Deserialize, Serialize};

/// Where the display name is remembered when nothing else is configured.
pub const DEFAULT_PREFERENCES_PATH: &str = "imposter_username.json";

/// Environment variable overriding [`DEFAULT_PREFERENCES_PATH`].
pub const PREFERENCES_ENV: &str = "IMPOSTER_PREFS";

/// Everything a client needs besides its store and identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON file holding the remembered display name. `None` keeps the
    /// name in memory only.
    pub preferences_path: Option<PathBuf>,

    pub game: GameConfig,

    pub timer: TimerConfig,
}

impl ClientConfig {
    /// Defaults, with the preferences path taken from `IMPOSTER_PREFS`
    /// when set.
    pub fn from_env() -> Self {
        let preferences_path = env::var_os(PREFERENCES_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH));
        Self {
            preferences_path: Some(preferences_path),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            preferences_path: Some(PathBuf::from(DEFAULT_PREFERENCES_PATH)),
            game: GameConfig::default(),
            timer: TimerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_client_config() {
        let config = ClientConfig::default();
        assert_eq!(
            config.preferences_path.as_deref(),
            Some(std::path::Path::new("imposter_username.json"))
        );
        assert_eq!(config.game.min_players, 3);
        assert_eq!(config.timer.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_config_serializes_catalog_as_list() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json["game"]["catalog"][0]["name"], "Tiere");
        assert_eq!(json["game"]["min_players"], 3);
    }
}
