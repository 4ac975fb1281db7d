//! Lobby lifecycle for Imposter.
//!
//! There is no game server: every client runs the same state machine and
//! writes its decisions straight into the shared lobby document. This
//! crate owns that state machine.
//!
//! # Key types
//!
//! - [`LobbySession`]: issues create/join/start/reveal/reset/category
//!   commands against a [`LobbyStore`](imposter_store::LobbyStore)
//! - [`RoundCommand`] and [`logic`]: pure transition planning, no I/O
//! - [`Catalog`]: category → candidate secret words
//! - [`GameConfig`]: player minimum and catalog
//! - [`Picker`]: the randomness seam for word and imposter draws
//! - [`generate_room_code`]: 4-character room codes

mod catalog;
mod code;
mod config;
mod error;
pub mod logic;
mod picker;
mod session;

pub use catalog::{Catalog, CategoryWords};
pub use code::generate_room_code;
pub use config::{GameConfig, MIN_PLAYERS};
pub use error::{Invalid, RoomError};
pub use logic::RoundCommand;
pub use picker::{FixedPicker, Picker, RandomPicker};
pub use session::LobbySession;
