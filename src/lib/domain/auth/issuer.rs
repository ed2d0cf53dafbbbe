//! Token issuer port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{AccessToken, AuthError, Credentials};

/// An identity provider performing the client-credentials exchange
#[async_trait]
pub trait TokenIssuer: Send + Sync + 'static {
    /// Exchanges application credentials for a bearer token.
    ///
    /// # Returns
    /// - [`Ok`] with a new [`AccessToken`].
    /// - [`Err`] with [`AuthError::CredentialsRejected`] when the provider refuses the
    ///   credentials, or [`AuthError::Unavailable`] when it cannot be reached.
    async fn issue(&self, credentials: &Credentials) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mock! {
    pub TokenIssuer {}

    #[async_trait]
    impl TokenIssuer for TokenIssuer {
        async fn issue(&self, credentials: &Credentials) -> Result<AccessToken, AuthError>;
    }
}
