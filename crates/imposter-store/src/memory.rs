//! In-process [`LobbyStore`] used by tests, the demo, and local play.
//!
//! Documents are kept JSON-encoded, exactly as a hosted store would hold
//! them, and every successful write decodes the stored bytes once and
//! pushes the result to each open feed for that code.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use imposter_protocol::{Codec, JsonCodec, Lobby, LobbyPatch, Player, RoomCode};
use tokio::sync::Mutex;

use crate::{FeedSender, LobbyStore, Snapshot, StoreError, Subscription};

/// A shared in-memory lobby store.
///
/// Cheap to clone; all clones see the same documents, which is how
/// several simulated clients share one "backend".
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    /// Number of store calls made through the [`LobbyStore`] trait.
    ops: AtomicU64,
    offline: AtomicBool,
    codec: JsonCodec,
}

#[derive(Default)]
struct State {
    docs: HashMap<RoomCode, Vec<u8>>,
    feeds: HashMap<RoomCode, Vec<FeedSender>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of trait calls served (including failed ones).
    pub fn op_count(&self) -> u64 {
        self.inner.ops.load(Ordering::Relaxed)
    }

    /// While offline, every trait call fails with
    /// [`StoreError::Unavailable`]. Open feeds are left alone.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::Relaxed);
        tracing::debug!(offline, "memory store connectivity changed");
    }

    /// Removes a document and tells its watchers it is gone.
    ///
    /// Returns `true` if a document was removed. Not part of the client
    /// contract; stands in for a lobby being cleaned up or abandoned.
    pub async fn delete(&self, code: &RoomCode) -> bool {
        let mut state = self.inner.state.lock().await;
        let existed = state.docs.remove(code).is_some();
        if existed {
            tracing::info!(%code, "lobby deleted");
            Self::broadcast(&mut state, code, || Ok(Snapshot::Absent));
        }
        existed
    }

    /// Fails every open feed for `code` with [`StoreError::FeedLost`]
    /// and drops them.
    pub async fn break_feeds(&self, code: &RoomCode, reason: &str) {
        let mut state = self.inner.state.lock().await;
        if let Some(feeds) = state.feeds.remove(code) {
            tracing::warn!(%code, feeds = feeds.len(), reason, "breaking change feeds");
            for feed in feeds {
                let _ = feed.send(Err(StoreError::FeedLost(reason.to_string())));
            }
        }
    }

    /// Number of live feeds for `code`. Released feeds are pruned first.
    pub async fn watcher_count(&self, code: &RoomCode) -> usize {
        let mut state = self.inner.state.lock().await;
        Self::prune(&mut state, code, |feed| !feed.is_closed())
    }

    /// Number of rooms the store still tracks feeds for.
    pub async fn watched_rooms(&self) -> usize {
        self.inner.state.lock().await.feeds.len()
    }

    /// Reads the raw stored bytes, bypassing connectivity checks.
    pub async fn raw_document(&self, code: &RoomCode) -> Option<Vec<u8>> {
        self.inner.state.lock().await.docs.get(code).cloned()
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.inner.ops.fetch_add(1, Ordering::Relaxed);
        if self.inner.offline.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Lobby, StoreError> {
        Ok(self.inner.codec.decode(bytes)?)
    }

    /// Read-modify-write of one document under the state lock.
    async fn modify(
        &self,
        code: &RoomCode,
        edit: impl FnOnce(&mut Lobby),
    ) -> Result<(), StoreError> {
        self.begin()?;
        let mut state = self.inner.state.lock().await;
        let bytes = state
            .docs
            .get(code)
            .ok_or_else(|| StoreError::Missing(code.clone()))?;
        let mut lobby = self.decode(bytes)?;
        edit(&mut lobby);
        self.store(&mut state, code, &lobby)
    }

    fn store(
        &self,
        state: &mut State,
        code: &RoomCode,
        lobby: &Lobby,
    ) -> Result<(), StoreError> {
        let bytes = self.inner.codec.encode(lobby)?;
        let stored = self.decode(&bytes)?;
        state.docs.insert(code.clone(), bytes);
        Self::broadcast(state, code, || Ok(Snapshot::Present(stored.clone())));
        Ok(())
    }

    /// Sends one delivery to every live feed of `code`, pruning feeds
    /// whose handle was released.
    fn broadcast(
        state: &mut State,
        code: &RoomCode,
        delivery: impl Fn() -> Result<Snapshot, StoreError>,
    ) {
        let live = Self::prune(state, code, |feed| feed.send(delivery()).is_ok());
        tracing::trace!(%code, feeds = live, "snapshot fanned out");
    }

    /// Keeps the feeds of `code` for which `keep` holds and forgets the
    /// room once none are left. Returns how many remain.
    fn prune(
        state: &mut State,
        code: &RoomCode,
        keep: impl FnMut(&FeedSender) -> bool,
    ) -> usize {
        let Some(feeds) = state.feeds.get_mut(code) else {
            return 0;
        };
        feeds.retain(keep);
        let live = feeds.len();
        if live == 0 {
            state.feeds.remove(code);
        }
        live
    }
}

impl LobbyStore for MemoryStore {
    async fn create(&self, code: &RoomCode, lobby: &Lobby) -> Result<(), StoreError> {
        self.begin()?;
        let mut state = self.inner.state.lock().await;
        if state.docs.contains_key(code) {
            tracing::warn!(%code, "overwriting existing lobby");
        }
        self.store(&mut state, code, lobby)
    }

    async fn read(&self, code: &RoomCode) -> Result<Option<Lobby>, StoreError> {
        self.begin()?;
        let state = self.inner.state.lock().await;
        state.docs.get(code).map(|bytes| self.decode(bytes)).transpose()
    }

    async fn update(&self, code: &RoomCode, patch: &LobbyPatch) -> Result<(), StoreError> {
        self.modify(code, |lobby| patch.apply(lobby)).await
    }

    async fn append_player(&self, code: &RoomCode, player: &Player) -> Result<(), StoreError> {
        self.modify(code, |lobby| lobby.players.push(player.clone()))
            .await
    }

    async fn subscribe(&self, code: &RoomCode) -> Result<Subscription, StoreError> {
        self.begin()?;
        let mut state = self.inner.state.lock().await;
        let current = match state.docs.get(code) {
            Some(bytes) => Snapshot::Present(self.decode(bytes)?),
            None => Snapshot::Absent,
        };

        let (subscription, feed) = Subscription::channel(code.clone());
        // The receiver is alive in `subscription`, so this cannot fail.
        let _ = feed.send(Ok(current));
        state.feeds.entry(code.clone()).or_default().push(feed);
        tracing::debug!(%code, "feed opened");
        Ok(subscription)
    }
}
