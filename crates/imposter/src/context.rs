//! `ClientContext` builder and the per-client collaborators it owns.
//!
//! One context is built when a client starts and disposed when it shuts
//! down. It ties the layers together: store → identity → preferences →
//! lobby commands.

use std::path::PathBuf;
use std::sync::Arc;

use imposter_room::{GameConfig, LobbySession, Picker, RandomPicker};
use imposter_session::{IdentityHandle, IdentityProvider, NamePreferences};
use imposter_store::LobbyStore;
use imposter_tick::{Clock, SystemClock, TimerConfig};

use crate::{ClientConfig, ImposterError};

/// Builder for a [`ClientContext`].
///
/// # Example
///
/// ```rust,ignore
/// use imposter::prelude::*;
///
/// let ctx = ClientContextBuilder::new()
///     .preferences_path("/tmp/imposter.json")
///     .build(Arc::new(MemoryStore::new()), Arc::new(AnonymousIdentity))
///     .await?;
/// let client = GameClient::new(ctx);
/// ```
pub struct ClientContextBuilder {
    config: ClientConfig,
    picker: Arc<dyn Picker>,
    clock: Arc<dyn Clock>,
}

impl ClientContextBuilder {
    /// Creates a builder from [`ClientConfig::from_env`].
    pub fn new() -> Self {
        Self {
            config: ClientConfig::from_env(),
            picker: Arc::new(RandomPicker),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the file the display name is remembered in.
    pub fn preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.preferences_path = Some(path.into());
        self
    }

    /// Keeps the display name in memory only.
    pub fn in_memory_preferences(mut self) -> Self {
        self.config.preferences_path = None;
        self
    }

    pub fn game_config(mut self, game: GameConfig) -> Self {
        self.config.game = game;
        self
    }

    pub fn timer_config(mut self, timer: TimerConfig) -> Self {
        self.config.timer = timer;
        self
    }

    /// Sets the source of word and imposter draws.
    pub fn picker(mut self, picker: impl Picker) -> Self {
        self.picker = Arc::new(picker);
        self
    }

    /// Sets the wall clock used for round start times and elapsed time.
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Loads preferences, starts signing in, and assembles the context.
    ///
    /// Sign-in runs in the background; see
    /// [`GameClient::wait_ready`](crate::GameClient::wait_ready).
    ///
    /// # Errors
    /// [`ImposterError::Session`] if the preferences file exists but
    /// can't be read or parsed.
    pub async fn build<S, P>(
        self,
        store: Arc<S>,
        identity: Arc<P>,
    ) -> Result<ClientContext<S>, ImposterError>
    where
        S: LobbyStore,
        P: IdentityProvider,
    {
        let preferences = match &self.config.preferences_path {
            Some(path) => NamePreferences::load(path).await?,
            None => NamePreferences::in_memory(),
        };

        let rooms = LobbySession::new(Arc::clone(&store), self.config.game)
            .with_picker(Arc::clone(&self.picker))
            .with_clock(Arc::clone(&self.clock));

        tracing::info!(
            preferences = %preferences.path().display(),
            remembered = preferences.name().is_some(),
            "client context initialized"
        );

        Ok(ClientContext {
            store,
            identity: IdentityHandle::start(identity),
            preferences,
            rooms,
            clock: self.clock,
            timer: self.config.timer,
        })
    }
}

impl Default for ClientContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The collaborators one client works with.
///
/// Replaces process-wide singletons: everything a client touches is
/// reachable from here and torn down by [`dispose`](Self::dispose).
pub struct ClientContext<S: LobbyStore> {
    pub(crate) store: Arc<S>,
    pub(crate) identity: IdentityHandle,
    pub(crate) preferences: NamePreferences,
    pub(crate) rooms: LobbySession<S>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) timer: TimerConfig,
}

impl<S: LobbyStore> ClientContext<S> {
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn identity(&self) -> &IdentityHandle {
        &self.identity
    }

    pub fn preferences(&self) -> &NamePreferences {
        &self.preferences
    }

    pub fn rooms(&self) -> &LobbySession<S> {
        &self.rooms
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Tears the context down. A sign-in still in flight is aborted.
    pub fn dispose(self) {
        tracing::info!(player = ?self.identity.current(), "client context disposed");
    }
}
