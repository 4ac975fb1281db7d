//! Watchable identity state.
//!
//! Sign-in is asynchronous and the rest of the client has to wait for
//! it. [`IdentityHandle`] runs the provider on its own task and publishes
//! the outcome on a `watch` channel, so any number of observers can check
//! the current state or wait for the change.
//!
//! ```text
//!   Pending ──(sign_in ok)──→ Ready(id)
//!      │
//!      └──(sign_in err)──→ Failed(reason)
//! ```

use std::sync::Arc;

use imposter_protocol::PlayerId;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{IdentityProvider, SessionError};

/// Where sign-in currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// Sign-in has not completed yet.
    Pending,
    /// Signed in; this is the client's id for the session.
    Ready(PlayerId),
    /// Sign-in failed. No retry happens until the client is rebuilt.
    Failed(String),
}

/// Owns the sign-in task and the channel its result is published on.
///
/// Dropping the handle aborts a sign-in still in flight.
pub struct IdentityHandle {
    state: watch::Receiver<IdentityState>,
    task: JoinHandle<()>,
}

impl IdentityHandle {
    /// Starts signing in with `provider` on a background task.
    pub fn start<P: IdentityProvider>(provider: Arc<P>) -> Self {
        let (tx, rx) = watch::channel(IdentityState::Pending);
        let task = tokio::spawn(async move {
            let next = match provider.sign_in().await {
                Ok(id) => IdentityState::Ready(id),
                Err(e) => {
                    tracing::error!(error = %e, "sign-in failed");
                    IdentityState::Failed(match e {
                        SessionError::IdentityFailed(reason) => reason,
                        other => other.to_string(),
                    })
                }
            };
            // Nobody listening means the client is gone already.
            let _ = tx.send(next);
        });
        Self { state: rx, task }
    }

    /// The current state, without waiting.
    pub fn state(&self) -> IdentityState {
        self.state.borrow().clone()
    }

    /// The player id if sign-in has completed.
    pub fn current(&self) -> Option<PlayerId> {
        match &*self.state.borrow() {
            IdentityState::Ready(id) => Some(id.clone()),
            _ => None,
        }
    }

    /// A fresh receiver for observers that want change notifications.
    pub fn watch(&self) -> watch::Receiver<IdentityState> {
        self.state.clone()
    }

    /// Waits until sign-in has finished.
    ///
    /// # Errors
    /// - [`SessionError::IdentityFailed`] if the provider failed
    /// - [`SessionError::IdentityUnavailable`] if the task ended without
    ///   publishing
    pub async fn ready(&mut self) -> Result<PlayerId, SessionError> {
        let settled = self
            .state
            .wait_for(|s| !matches!(s, IdentityState::Pending))
            .await
            .map_err(|_| SessionError::IdentityUnavailable)?;
        match &*settled {
            IdentityState::Ready(id) => Ok(id.clone()),
            IdentityState::Failed(reason) => Err(SessionError::IdentityFailed(reason.clone())),
            IdentityState::Pending => Err(SessionError::IdentityUnavailable),
        }
    }
}

impl Drop for IdentityHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
