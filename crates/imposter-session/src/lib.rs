//! Player identity and local preferences for Imposter.
//!
//! This crate covers everything a client knows about *itself*:
//!
//! 1. **Identity**: who this client is ([`IdentityProvider`] trait,
//!    [`AnonymousIdentity`])
//! 2. **Identity state**: a watchable handle that flips from pending to
//!    ready (or failed) once sign-in completes ([`IdentityHandle`])
//! 3. **Preferences**: the display name remembered on this device
//!    ([`NamePreferences`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← needs the caller's PlayerId for every command
//!     ↕
//! Session Layer (this crate)  ← provides identity and remembered name
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId
//! ```

mod error;
mod handle;
mod identity;
mod preferences;

pub use error::SessionError;
pub use handle::{IdentityHandle, IdentityState};
pub use identity::{AnonymousIdentity, IdentityProvider};
pub use preferences::NamePreferences;
