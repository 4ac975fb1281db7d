//! Error types for the session layer.

/// Errors that can occur while establishing who this client is.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity provider refused or failed to hand out an identity.
    /// Fatal for the client until it is re-initialised.
    #[error("sign-in failed: {0}")]
    IdentityFailed(String),

    /// The sign-in task went away before publishing a result.
    #[error("identity provider stopped before signing in")]
    IdentityUnavailable,

    /// The preferences file could not be read or written.
    #[error("preferences i/o failed: {0}")]
    Preferences(#[from] std::io::Error),

    /// The preferences file exists but is not valid JSON.
    #[error("preferences file is malformed: {0}")]
    PreferencesFormat(#[from] serde_json::Error),
}
