//! # Imposter
//!
//! Client side of a "find the imposter" party game. There is no game
//! server: every client runs the lobby state machine itself and writes
//! its decisions into a shared lobby document. Everything on screen is
//! derived from the snapshots the store pushes back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use imposter::prelude::*;
//!
//! # async fn run() -> Result<(), ImposterError> {
//! let store = Arc::new(MemoryStore::new());
//! let ctx = ClientContextBuilder::new()
//!     .in_memory_preferences()
//!     .build(store, Arc::new(AnonymousIdentity))
//!     .await?;
//!
//! let mut client = GameClient::new(ctx);
//! client.wait_ready().await?;
//! client.set_name("Ana");
//! let code = client.create_room().await?;
//! println!("share this code: {code}");
//!
//! while let Some(event) = client.next_event().await {
//!     println!("{event:?} -> {:?}", client.view());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod context;
mod error;
mod logging;
mod view;

pub use client::{ClientEvent, GameClient};
pub use config::{ClientConfig, DEFAULT_PREFERENCES_PATH, PREFERENCES_ENV};
pub use context::{ClientContext, ClientContextBuilder};
pub use error::ImposterError;
pub use logging::init_tracing;
pub use view::{ClientView, PlayerRow, UNKNOWN_PLAYER};

pub mod prelude {
    pub use crate::{
        ClientConfig, ClientContext, ClientContextBuilder, ClientEvent, ClientView, GameClient,
        ImposterError, PlayerRow, init_tracing,
    };
    pub use imposter_protocol::{Lobby, LobbyStatus, Player, PlayerId, Role, RoomCode};
    pub use imposter_room::{Catalog, FixedPicker, GameConfig, Picker, RoomError};
    pub use imposter_session::{AnonymousIdentity, IdentityProvider, IdentityState, SessionError};
    pub use imposter_store::{LobbyStore, MemoryStore, StoreError};
    pub use imposter_tick::{Clock, ManualClock, SystemClock, TimerConfig, format_elapsed};
}
