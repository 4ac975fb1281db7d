//! Lobby commands over a shared store.
//!
//! [`LobbySession`] is the only place that writes lobby documents. Each
//! command validates locally first (no store call for bad input), reads
//! the current document where the decision depends on it, plans the
//! write with [`logic`](crate::logic), and issues exactly one write.
//!
//! Commands are fire-and-report: a failed write is logged and returned,
//! never retried. The document in the store stays the source of truth.

use std::sync::Arc;

use imposter_protocol::{Lobby, Player, PlayerId, RoomCode};
use imposter_store::{LobbyStore, StoreError};
use imposter_tick::{Clock, SystemClock};

use crate::logic::{self, RoundCommand};
use crate::{GameConfig, Invalid, Picker, RandomPicker, RoomError, generate_room_code};

/// Issues lobby commands on behalf of one client.
///
/// Cheap to clone; the store, picker, and clock are shared.
pub struct LobbySession<S: LobbyStore> {
    store: Arc<S>,
    config: Arc<GameConfig>,
    picker: Arc<dyn Picker>,
    clock: Arc<dyn Clock>,
}

impl<S: LobbyStore> Clone for LobbySession<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            picker: Arc::clone(&self.picker),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: LobbyStore> LobbySession<S> {
    /// Creates a session with random draws and the system clock.
    pub fn new(store: Arc<S>, config: GameConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            picker: Arc::new(RandomPicker),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the source of word and imposter draws.
    pub fn with_picker(mut self, picker: impl Picker) -> Self {
        self.picker = Arc::new(picker);
        self
    }

    /// Replaces the clock round start times are read from.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates a lobby under a freshly generated code with `caller` as
    /// host and only player.
    ///
    /// # Errors
    /// [`RoomError::Validation`] for an empty name (no store call),
    /// [`RoomError::Store`] if the write fails.
    pub async fn create_room(&self, caller: &PlayerId, name: &str) -> Result<Lobby, RoomError> {
        let name = logic::validate_name(name)?;
        self.create_with_code(caller, &name, generate_room_code()).await
    }

    /// Like [`create_room`](Self::create_room), under a chosen code.
    ///
    /// An existing lobby under `code` is overwritten.
    pub async fn create_room_with_code(
        &self,
        caller: &PlayerId,
        name: &str,
        code: RoomCode,
    ) -> Result<Lobby, RoomError> {
        let name = logic::validate_name(name)?;
        self.create_with_code(caller, &name, code).await
    }

    async fn create_with_code(
        &self,
        caller: &PlayerId,
        name: &str,
        code: RoomCode,
    ) -> Result<Lobby, RoomError> {
        let lobby = Lobby::new(
            code,
            Player::new(caller.clone(), name),
            self.config.catalog.default_category(),
        );
        self.store
            .create(&lobby.code, &lobby)
            .await
            .map_err(|e| store_failed("create", &lobby.code, e))?;
        tracing::info!(code = %lobby.code, host = %caller, "room created");
        Ok(lobby)
    }

    /// Joins the lobby under `code` (user input, normalized here).
    ///
    /// Joining a lobby the caller is already in changes nothing.
    ///
    /// # Errors
    /// - [`RoomError::Validation`] for an empty name or malformed code;
    ///   no store call is made
    /// - [`RoomError::NotFound`] if no lobby exists under the code
    /// - [`RoomError::StateConflict`] if the lobby isn't in `lobby`
    /// - [`RoomError::Store`] if the read or the append fails
    pub async fn join_room(
        &self,
        caller: &PlayerId,
        code: &str,
        name: &str,
    ) -> Result<Lobby, RoomError> {
        let name = logic::validate_name(name)?;
        let code = RoomCode::parse(code)
            .map_err(|_| RoomError::Validation(Invalid::RoomCode(code.to_string())))?;

        let mut lobby = self
            .store
            .read(&code)
            .await
            .map_err(|e| store_failed("join", &code, e))?
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        match logic::plan_join(&lobby, caller, &name)? {
            Some(player) => {
                self.store
                    .append_player(&code, &player)
                    .await
                    .map_err(|e| store_failed("join", &code, e))?;
                tracing::info!(%code, player = %caller, players = lobby.players.len() + 1, "player joined");
                lobby.players.push(player);
            }
            None => {
                tracing::debug!(%code, player = %caller, "re-joined, already listed");
            }
        }
        Ok(lobby)
    }

    /// Switches the word category. Host only, `lobby` phase only.
    pub async fn change_category(
        &self,
        caller: &PlayerId,
        code: &RoomCode,
        category: &str,
    ) -> Result<Lobby, RoomError> {
        if !self.config.catalog.contains(category) {
            return Err(RoomError::Validation(Invalid::UnknownCategory(
                category.to_string(),
            )));
        }
        self.apply(caller, code, RoundCommand::ChangeCategory(category.to_string()))
            .await
    }

    /// Starts a round (or the next one after a reveal). Host only.
    pub async fn start_game(&self, caller: &PlayerId, code: &RoomCode) -> Result<Lobby, RoomError> {
        self.apply(caller, code, RoundCommand::Start).await
    }

    /// Reveals the imposter and the word. Host only.
    pub async fn reveal(&self, caller: &PlayerId, code: &RoomCode) -> Result<Lobby, RoomError> {
        self.apply(caller, code, RoundCommand::Reveal).await
    }

    /// Clears the round and returns to the waiting room. Host only.
    pub async fn reset_game(&self, caller: &PlayerId, code: &RoomCode) -> Result<Lobby, RoomError> {
        self.apply(caller, code, RoundCommand::Reset).await
    }

    /// Reads the current document, plans `command`, and writes the patch.
    ///
    /// Returns the document as it looks after the write.
    ///
    /// # Errors
    /// [`RoomError::RoomClosed`] if the document is gone, plus anything
    /// [`logic::plan`] rejects, plus [`RoomError::Store`].
    pub async fn apply(
        &self,
        caller: &PlayerId,
        code: &RoomCode,
        command: RoundCommand,
    ) -> Result<Lobby, RoomError> {
        let action = command.action();
        let mut lobby = self
            .store
            .read(code)
            .await
            .map_err(|e| store_failed(action, code, e))?
            .ok_or_else(|| RoomError::RoomClosed(code.clone()))?;
        let was_valid = cfg!(debug_assertions) && lobby.check_invariants().is_ok();

        let patch = logic::plan(
            &lobby,
            caller,
            &command,
            &self.config,
            self.picker.as_ref(),
            self.clock.now_millis(),
        )?;

        self.store
            .update(code, &patch)
            .await
            .map_err(|e| store_failed(action, code, e))?;
        patch.apply(&mut lobby);
        debug_assert!(
            !was_valid || lobby.check_invariants().is_ok(),
            "{action} left room {code} inconsistent: {lobby:?}"
        );

        tracing::info!(%code, by = %caller, status = %lobby.status, category = %lobby.category, "{action} applied");
        Ok(lobby)
    }
}

fn store_failed(action: &str, code: &RoomCode, error: StoreError) -> RoomError {
    tracing::warn!(%code, action, error = %error, "store call failed");
    RoomError::Store(error)
}
