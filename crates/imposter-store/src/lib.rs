//! Lobby store abstraction for Imposter.
//!
//! Provides the [`LobbyStore`] trait: the contract every client relies on
//! for persistence and real-time fan-out of lobby documents. Clients never
//! talk to each other directly; they write to the store and read back the
//! snapshots it pushes.
//!
//! # Feature Flags
//!
//! - `memory` (default): in-process [`MemoryStore`]

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "memory")]
mod memory;

pub use error::StoreError;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;

use std::future::Future;

use imposter_protocol::{Lobby, LobbyPatch, Player, RoomCode};
use tokio::sync::mpsc;

/// One delivery on a change feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// The full current document.
    Present(Lobby),
    /// No document exists under the subscribed code (never created, or
    /// deleted since).
    Absent,
}

/// Sending half of a change feed, held by store implementations.
pub type FeedSender = mpsc::UnboundedSender<Result<Snapshot, StoreError>>;

/// Document store keyed by room code.
///
/// Writes are last-write-wins; the trait promises atomicity per call,
/// nothing across calls. Access control is not part of the contract.
pub trait LobbyStore: Send + Sync + 'static {
    /// Writes a full document, creating it or overwriting whatever is
    /// stored under `code`.
    fn create(
        &self,
        code: &RoomCode,
        lobby: &Lobby,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Point lookup. `Ok(None)` when nothing is stored under `code`.
    fn read(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Option<Lobby>, StoreError>> + Send;

    /// Atomically merges `patch` into the stored document.
    ///
    /// # Errors
    /// [`StoreError::Missing`] if no document exists.
    fn update(
        &self,
        code: &RoomCode,
        patch: &LobbyPatch,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Appends `player` to the document's player list.
    ///
    /// No duplicate check happens here; callers dedupe before appending.
    ///
    /// # Errors
    /// [`StoreError::Missing`] if no document exists.
    fn append_player(
        &self,
        code: &RoomCode,
        player: &Player,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Opens a change feed for `code`.
    ///
    /// The current state is delivered immediately, then every change.
    /// Dropping or [releasing](Subscription::unsubscribe) the returned
    /// handle stops delivery.
    fn subscribe(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Subscription, StoreError>> + Send;
}

/// Owned handle to a change feed.
///
/// Delivery stops when the handle is released, either explicitly through
/// [`unsubscribe`](Self::unsubscribe) or by dropping it.
#[derive(Debug)]
pub struct Subscription {
    code: RoomCode,
    feed: Option<mpsc::UnboundedReceiver<Result<Snapshot, StoreError>>>,
}

impl Subscription {
    /// Creates a subscription handle and the sender a store pushes into.
    pub fn channel(code: RoomCode) -> (Self, FeedSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                code,
                feed: Some(rx),
            },
            tx,
        )
    }

    /// The room code this feed watches.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Returns `true` until the handle is released.
    pub fn is_active(&self) -> bool {
        self.feed.is_some()
    }

    /// Waits for the next delivery.
    ///
    /// Returns `None` once the handle is released or the store has
    /// dropped the feed.
    pub async fn next(&mut self) -> Option<Result<Snapshot, StoreError>> {
        match &mut self.feed {
            Some(feed) => feed.recv().await,
            None => None,
        }
    }

    /// Returns a delivery if one is already queued.
    pub fn try_next(&mut self) -> Option<Result<Snapshot, StoreError>> {
        self.feed.as_mut().and_then(|feed| feed.try_recv().ok())
    }

    /// Stops delivery. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if self.feed.take().is_some() {
            tracing::debug!(code = %self.code, "subscription released");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> RoomCode {
        RoomCode::parse("ABCD").unwrap()
    }

    #[tokio::test]
    async fn test_subscription_delivers_until_released() {
        let (mut sub, tx) = Subscription::channel(code());
        tx.send(Ok(Snapshot::Absent)).unwrap();

        assert!(matches!(sub.next().await, Some(Ok(Snapshot::Absent))));
        assert!(sub.is_active());

        sub.unsubscribe();
        assert!(!sub.is_active());
        assert!(tx.is_closed());
        assert!(sub.next().await.is_none());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let (mut sub, tx) = Subscription::channel(code());
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(tx.is_closed());
    }

    #[test]
    fn test_drop_releases_feed() {
        let (sub, tx) = Subscription::channel(code());
        drop(sub);
        assert!(tx.is_closed());
    }

    #[test]
    fn test_try_next_without_delivery() {
        let (mut sub, _tx) = Subscription::channel(code());
        assert!(sub.try_next().is_none());
        assert_eq!(sub.code(), &code());
    }
}
