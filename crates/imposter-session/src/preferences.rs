//! The display name remembered on this device.
//!
//! Stored as a tiny JSON file (`{"username": "Ana"}`) so the name can be
//! pre-filled on the next launch. Nothing here is synchronized across
//! devices.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SessionError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// Device-local preferences backed by a JSON file.
#[derive(Debug, Clone)]
pub struct NamePreferences {
    path: PathBuf,
    name: Option<String>,
}

impl NamePreferences {
    /// Loads preferences from `path`. A missing file means no name yet.
    ///
    /// # Errors
    /// [`SessionError::Preferences`] on I/O failure other than not-found,
    /// [`SessionError::PreferencesFormat`] if the file is not valid JSON.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let stored = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<StoredPreferences>(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoredPreferences::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), remembered = stored.username.is_some(), "preferences loaded");
        Ok(Self {
            path,
            name: stored.username.filter(|n| !n.trim().is_empty()),
        })
    }

    /// Preferences that are never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            name: None,
        }
    }

    /// The remembered display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Where the preferences live on disk; empty for in-memory preferences.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remembers `name` and writes it through to disk.
    ///
    /// # Errors
    /// [`SessionError::Preferences`] if the file cannot be written. The
    /// in-memory value is updated either way.
    pub async fn remember(&mut self, name: &str) -> Result<(), SessionError> {
        self.name = Some(name.to_string());
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let stored = StoredPreferences {
            username: self.name.clone(),
        };
        tokio::fs::write(&self.path, serde_json::to_vec(&stored)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "imposter-prefs-{tag}-{}.json",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_missing_file_means_no_name() {
        let path = temp_path("missing");
        let _ = tokio::fs::remove_file(&path).await;
        let prefs = NamePreferences::load(&path).await.unwrap();
        assert_eq!(prefs.name(), None);
    }

    #[tokio::test]
    async fn test_remember_survives_reload() {
        let path = temp_path("reload");
        let mut prefs = NamePreferences::load(&path).await.unwrap();
        prefs.remember("Ana").await.unwrap();

        let reloaded = NamePreferences::load(&path).await.unwrap();
        assert_eq!(reloaded.name(), Some("Ana"));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let path = temp_path("malformed");
        tokio::fs::write(&path, b"not json").await.unwrap();
        let err = NamePreferences::load(&path).await.unwrap_err();
        assert!(matches!(err, SessionError::PreferencesFormat(_)));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_in_memory_preferences_never_touch_disk() {
        let mut prefs = NamePreferences::in_memory();
        prefs.remember("Ben").await.unwrap();
        assert_eq!(prefs.name(), Some("Ben"));
        assert!(prefs.path().as_os_str().is_empty());
    }
}
