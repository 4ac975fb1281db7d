//! Per-client controller.
//!
//! A [`GameClient`] holds what one player's device knows: the name typed
//! in, the room it's in, the last snapshot of that room, the inline error
//! message and the role toggle. Commands go through the lobby session;
//! the resulting document comes back through the change feed, and
//! [`GameClient::next_event`] folds it into local state.
//!
//! The feed is the only thing that changes the displayed room. A command
//! that fails leaves the local state as it was and reports an error.

use std::sync::Arc;

use imposter_protocol::{Lobby, LobbyStatus, PlayerId, Role, RoomCode};
use imposter_room::{RoomError, logic};
use imposter_session::{IdentityState, SessionError};
use imposter_store::{LobbyStore, Snapshot, StoreError, Subscription};
use imposter_tick::RoundTimer;

use crate::{ClientContext, ClientView, ImposterError};

const CREATE_FAILED: &str = "Fehler beim Erstellen des Raums.";
const JOIN_FAILED: &str = "Fehler beim Beitreten.";

/// What [`GameClient::next_event`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A fresh document for the current room was applied.
    Snapshot,
    /// The room's document is gone; the client is back on the landing
    /// screen.
    RoomClosed(RoomCode),
    /// The change feed failed. The last snapshot stays on screen.
    ConnectionLost,
    /// The round timer fired; carries the recomputed elapsed seconds.
    Tick(u64),
}

enum Wake {
    Feed(Option<Result<Snapshot, StoreError>>),
    Tick(u64),
}

/// One player's client.
pub struct GameClient<S: LobbyStore> {
    ctx: ClientContext<S>,
    name: String,
    room_code: Option<RoomCode>,
    lobby: Option<Lobby>,
    error: Option<String>,
    show_role: bool,
    elapsed: u64,
    /// Start time of the last round seen, to spot new rounds.
    round_start: Option<u64>,
    timer: RoundTimer,
    subscription: Option<Subscription>,
}

impl<S: LobbyStore> GameClient<S> {
    /// Creates a client, pre-filling the name remembered on this device.
    pub fn new(ctx: ClientContext<S>) -> Self {
        let name = ctx.preferences.name().unwrap_or_default().to_string();
        let timer = RoundTimer::new(ctx.timer.clone());
        Self {
            ctx,
            name,
            room_code: None,
            lobby: None,
            error: None,
            show_role: false,
            elapsed: 0,
            round_start: None,
            timer,
            subscription: None,
        }
    }

    /// Waits for sign-in to finish.
    ///
    /// A failure is also recorded as the inline error; the client stays
    /// unusable until it is rebuilt.
    pub async fn wait_ready(&mut self) -> Result<PlayerId, ImposterError> {
        match self.ctx.identity.ready().await {
            Ok(id) => Ok(id),
            Err(e) => Err(self.report(e.into())),
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn context(&self) -> &ClientContext<S> {
        &self.ctx
    }

    pub fn identity_state(&self) -> IdentityState {
        self.ctx.identity.state()
    }

    /// This client's player id, once signed in.
    pub fn player_id(&self) -> Option<PlayerId> {
        self.ctx.identity.current()
    }

    /// The name as currently typed (not trimmed).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The room this client is in, if any.
    pub fn room_code(&self) -> Option<&RoomCode> {
        self.room_code.as_ref()
    }

    /// The last document received for the current room.
    pub fn lobby(&self) -> Option<&Lobby> {
        self.lobby.as_ref()
    }

    /// The inline error message, if one is showing.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_role_visible(&self) -> bool {
        self.show_role
    }

    /// Seconds into the current round as of the last tick or snapshot.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Returns `true` while a change feed is open.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Whether this client hosts the current room.
    pub fn is_host(&self) -> bool {
        match (&self.lobby, self.player_id()) {
            (Some(lobby), Some(id)) => lobby.is_host(&id),
            _ => false,
        }
    }

    /// This client's own role in the running or revealed round.
    pub fn role(&self) -> Option<Role> {
        let id = self.player_id()?;
        self.lobby.as_ref()?.role_of(&id)
    }

    /// Projects local state into what should be on screen.
    pub fn view(&self) -> ClientView {
        ClientView::project(self)
    }

    // -- Landing -----------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Creates a room with this client as host and enters it.
    ///
    /// # Errors
    /// See [`LobbySession::create_room`](imposter_room::LobbySession::create_room).
    /// Failures also set the inline error.
    pub async fn create_room(&mut self) -> Result<RoomCode, ImposterError> {
        let caller = self.caller()?;
        let name = self.checked_name()?;
        self.remember_name(&name).await;

        let lobby = match self.ctx.rooms.create_room(&caller, &name).await {
            Ok(lobby) => lobby,
            Err(e) => return Err(self.report_as(e.into(), CREATE_FAILED)),
        };
        self.enter(lobby).await
    }

    /// Joins the room under `code` (as typed) and enters it.
    ///
    /// # Errors
    /// See [`LobbySession::join_room`](imposter_room::LobbySession::join_room).
    /// Failures also set the inline error.
    pub async fn join_room(&mut self, code: &str) -> Result<RoomCode, ImposterError> {
        let caller = self.caller()?;
        let name = self.checked_name()?;
        self.remember_name(&name).await;

        let lobby = match self.ctx.rooms.join_room(&caller, code, &name).await {
            Ok(lobby) => lobby,
            Err(e) => return Err(self.report_as(e.into(), JOIN_FAILED)),
        };
        self.enter(lobby).await
    }

    // -- Room commands -----------------------------------------------------

    /// Switches the word category (host, waiting room only).
    pub async fn change_category(&mut self, category: &str) -> Result<(), ImposterError> {
        let (caller, code) = self.in_room()?;
        let result = self.ctx.rooms.change_category(&caller, &code, category).await;
        self.settle(result)
    }

    /// Starts a round, or the next one after a reveal (host only).
    pub async fn start_game(&mut self) -> Result<(), ImposterError> {
        let (caller, code) = self.in_room()?;
        let result = self.ctx.rooms.start_game(&caller, &code).await;
        self.settle(result)
    }

    /// Ends the round and shows who the imposter was (host only).
    pub async fn reveal(&mut self) -> Result<(), ImposterError> {
        let (caller, code) = self.in_room()?;
        let result = self.ctx.rooms.reveal(&caller, &code).await;
        self.settle(result)
    }

    /// Goes back to the waiting room (host only).
    pub async fn reset_game(&mut self) -> Result<(), ImposterError> {
        let (caller, code) = self.in_room()?;
        let result = self.ctx.rooms.reset_game(&caller, &code).await;
        self.settle(result)
    }

    /// Forgets the current room locally.
    ///
    /// The shared player list is not touched; the other players still
    /// see this client listed.
    pub fn leave_room(&mut self) {
        if let Some(code) = self.room_code.take() {
            tracing::info!(%code, player = ?self.player_id(), "left room");
        }
        self.clear_room();
    }

    /// Shows or hides this client's role. Returns the new visibility.
    pub fn toggle_role(&mut self) -> bool {
        self.show_role = !self.show_role;
        self.show_role
    }

    // -- Event loop --------------------------------------------------------

    /// Waits for the next feed delivery or timer tick and applies it.
    ///
    /// Returns `None` straight away when there is nothing to wait for
    /// (no room and no running round).
    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        if self.subscription.is_none() && !self.timer.is_running() {
            return None;
        }

        let clock = Arc::clone(&self.ctx.clock);
        let wake = tokio::select! {
            delivery = next_delivery(&mut self.subscription) => Wake::Feed(delivery),
            secs = self.timer.wait_for_tick(&clock) => Wake::Tick(secs),
        };

        Some(match wake {
            Wake::Tick(secs) => {
                self.elapsed = secs;
                ClientEvent::Tick(secs)
            }
            Wake::Feed(Some(Ok(Snapshot::Present(lobby)))) => {
                self.apply(lobby);
                ClientEvent::Snapshot
            }
            Wake::Feed(Some(Ok(Snapshot::Absent))) => self.room_closed(),
            Wake::Feed(Some(Err(e))) => self.connection_lost(&e.to_string()),
            Wake::Feed(None) => self.connection_lost("feed closed"),
        })
    }

    /// Drains every delivery already queued without waiting.
    ///
    /// Returns the events applied, in order.
    pub fn drain_events(&mut self) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        while let Some(delivery) = self.subscription.as_mut().and_then(Subscription::try_next) {
            events.push(match delivery {
                Ok(Snapshot::Present(lobby)) => {
                    self.apply(lobby);
                    ClientEvent::Snapshot
                }
                Ok(Snapshot::Absent) => self.room_closed(),
                Err(e) => self.connection_lost(&e.to_string()),
            });
        }
        events
    }

    /// Releases the feed and tears the context down.
    pub fn dispose(mut self) {
        self.release_subscription();
        self.timer.stop();
        let ctx = self.ctx;
        ctx.dispose();
    }

    // -- Internals ---------------------------------------------------------

    fn caller(&mut self) -> Result<PlayerId, ImposterError> {
        match self.ctx.identity.current() {
            Some(id) => Ok(id),
            None => Err(self.report(SessionError::IdentityUnavailable.into())),
        }
    }

    fn checked_name(&mut self) -> Result<String, ImposterError> {
        logic::validate_name(&self.name).map_err(|e| self.report(e.into()))
    }

    fn in_room(&mut self) -> Result<(PlayerId, RoomCode), ImposterError> {
        let caller = self.caller()?;
        match self.room_code.clone() {
            Some(code) => Ok((caller, code)),
            None => Err(self.report(ImposterError::NotInRoom)),
        }
    }

    async fn remember_name(&mut self, name: &str) {
        if let Err(e) = self.ctx.preferences.remember(name).await {
            tracing::warn!(error = %e, "could not persist display name");
        }
    }

    /// Makes `lobby` the current room and opens its feed.
    async fn enter(&mut self, lobby: Lobby) -> Result<RoomCode, ImposterError> {
        let code = lobby.code.clone();
        if self.room_code.as_ref() != Some(&code) || !self.is_subscribed() {
            self.release_subscription();
            match self.ctx.store.subscribe(&code).await {
                Ok(sub) => self.subscription = Some(sub),
                Err(e) => return Err(self.report(e.into())),
            }
        }
        self.room_code = Some(code.clone());
        self.error = None;
        self.apply(lobby);
        Ok(code)
    }

    /// Folds a document into local state and drives the timer.
    fn apply(&mut self, lobby: Lobby) {
        tracing::debug!(code = %lobby.code, status = %lobby.status, players = lobby.players.len(), "snapshot");
        match (lobby.status, lobby.start_time) {
            (LobbyStatus::Playing, Some(start)) => {
                if self.round_start != Some(start) {
                    self.round_start = Some(start);
                    self.show_role = false;
                }
                self.timer.start(start);
                self.elapsed = self.timer.elapsed(&self.ctx.clock);
            }
            _ => self.timer.stop(),
        }
        self.lobby = Some(lobby);
    }

    fn room_closed(&mut self) -> ClientEvent {
        let code = self.room_code.take();
        self.clear_room();
        self.error = Some("Der Raum wurde geschlossen.".into());
        match code {
            Some(code) => {
                tracing::warn!(%code, "room closed");
                ClientEvent::RoomClosed(code)
            }
            None => ClientEvent::ConnectionLost,
        }
    }

    fn connection_lost(&mut self, reason: &str) -> ClientEvent {
        tracing::warn!(code = ?self.room_code, reason, "room sync lost");
        self.release_subscription();
        self.error = Some(ImposterError::from(StoreError::FeedLost(reason.to_string())).user_message());
        ClientEvent::ConnectionLost
    }

    fn clear_room(&mut self) {
        self.release_subscription();
        self.lobby = None;
        self.timer.stop();
        self.show_role = false;
        self.round_start = None;
        self.elapsed = 0;
    }

    fn release_subscription(&mut self) {
        if let Some(mut sub) = self.subscription.take() {
            sub.unsubscribe();
        }
    }

    fn settle(&mut self, result: Result<Lobby, RoomError>) -> Result<(), ImposterError> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(self.report(e.into())),
        }
    }

    fn report(&mut self, err: ImposterError) -> ImposterError {
        self.error = Some(err.user_message());
        err
    }

    /// Like [`report`](Self::report), with a fixed message for store
    /// failures.
    fn report_as(&mut self, err: ImposterError, store_failure: &str) -> ImposterError {
        self.error = Some(if err.is_store_failure() {
            store_failure.to_string()
        } else {
            err.user_message()
        });
        err
    }
}

async fn next_delivery(
    subscription: &mut Option<Subscription>,
) -> Option<Result<Snapshot, StoreError>> {
    match subscription {
        Some(sub) => sub.next().await,
        None => std::future::pending().await,
    }
}
