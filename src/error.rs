//! Error taxonomy
//!
//! Auth failures are shown verbatim on the login surface, so `AuthError`
//! variants carry the gateway's human-readable text where one exists.
//! Store failures are returned to callers; delivery failures inside live
//! subscriptions are logged and never surfaced (last known value stays).

use thiserror::Error;

/// Errors from the external auth gateway.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    DuplicateAccount,

    #[error("could not reach the auth gateway: {0}")]
    Network(String),

    /// Anything else the gateway reports; message passed through as-is.
    #[error("{0}")]
    Gateway(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Network(err.to_string())
    }
}

/// Errors from the external document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("could not reach the document store: {0}")]
    Network(String),

    #[error("store rejected the request: {0}")]
    Gateway(String),

    #[error("document encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed document at {path}: {reason}")]
    Decode { path: String, reason: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

/// Crate-level error for operations that cross the auth and store seams.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("not signed in")]
    NoSession,
}
