//! Identity hook for obtaining the caller's player id.
//!
//! Imposter doesn't run an auth backend of its own. A hosted provider
//! (anonymous sign-in) hands each device an opaque id that is stable for
//! the session, and that id is all the game needs: it becomes the
//! [`PlayerId`] in every lobby document the client writes.
//!
//! The [`IdentityProvider`] trait lets a real provider, the built-in
//! [`AnonymousIdentity`], and test doubles be swapped without touching
//! any game code.

use std::future::Future;

use imposter_protocol::PlayerId;
use rand::Rng;

use crate::SessionError;

/// Produces this client's identity.
///
/// - `Send + Sync` → shared with the task that performs sign-in.
/// - `'static` → lives as long as the client context.
///
/// # Example
///
/// ```rust
/// use imposter_protocol::PlayerId;
/// use imposter_session::{IdentityProvider, SessionError};
///
/// /// Always signs in as the same player. Handy for tests.
/// struct FixedIdentity(&'static str);
///
/// impl IdentityProvider for FixedIdentity {
///     async fn sign_in(&self) -> Result<PlayerId, SessionError> {
///         Ok(PlayerId::new(self.0))
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Signs in and returns the identity for this session.
    ///
    /// # Errors
    /// [`SessionError::IdentityFailed`] if the provider rejects the
    /// request or cannot be reached.
    fn sign_in(&self) -> impl Future<Output = Result<PlayerId, SessionError>> + Send;
}

/// Hands out a fresh random identity per sign-in, the way anonymous auth
/// providers do.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

impl AnonymousIdentity {
    /// Length of generated ids.
    pub const ID_LENGTH: usize = 28;
}

impl IdentityProvider for AnonymousIdentity {
    async fn sign_in(&self) -> Result<PlayerId, SessionError> {
        let id = generate_uid(Self::ID_LENGTH);
        tracing::info!(player = %id, "signed in anonymously");
        Ok(PlayerId(id))
    }
}

const UID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random alphanumeric string of `len` characters.
fn generate_uid(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| UID_CHARSET[rng.random_range(0..UID_CHARSET.len())] as char)
        .collect()
}
