//! Authentication errors

use thiserror::Error;

/// Errors that can occur when acquiring an access token
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider rejected the application credentials
    #[error("credentials rejected by the identity provider: {0}")]
    CredentialsRejected(String),

    /// The identity provider could not be reached
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl AuthError {
    /// Whether retrying the token exchange may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Unavailable(_))
    }
}
