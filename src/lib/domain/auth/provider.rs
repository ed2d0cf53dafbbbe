//! Cached token provider

use std::{fmt, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::sending::RetryPolicy;

use super::{AccessToken, AuthError, Credentials, TokenIssuer};

/// Tokens expiring within this margin are refreshed before use
pub const REFRESH_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Hands out a valid bearer token, refreshing it from the [`TokenIssuer`]
/// shortly before it expires.
///
/// The cache is guarded by a single lock held for the whole exchange, so a
/// caller sees either the previous token or the fully replaced one.
pub struct TokenProvider<I>
where
    I: TokenIssuer,
{
    issuer: Arc<I>,
    credentials: Credentials,
    retry: RetryPolicy,
    cached: Mutex<Option<AccessToken>>,
}

impl<I> fmt::Debug for TokenProvider<I>
where
    I: TokenIssuer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl<I> TokenProvider<I>
where
    I: TokenIssuer,
{
    /// Create a provider with an empty cache
    pub fn new(issuer: Arc<I>, credentials: Credentials) -> Self {
        Self {
            issuer,
            credentials,
            retry: RetryPolicy::token_exchange(),
            cached: Mutex::new(None),
        }
    }

    /// Use `retry` for transient token endpoint failures
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Start from an already acquired token
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.cached = Mutex::new(Some(token));
        self
    }

    /// The credentials this provider authenticates with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the cached token, or exchanges the credentials for a new one
    /// when there is none or it expires within [`REFRESH_MARGIN`].
    pub async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.expires_within(REFRESH_MARGIN) {
                return Ok(token.clone());
            }

            debug!(expires_at = %token.expires_at(), "access token about to expire");
        }

        let token = self.exchange().await?;
        *cached = Some(token.clone());

        Ok(token)
    }

    /// Replaces the cached token regardless of its expiry
    pub async fn refresh(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;

        let token = self.exchange().await?;
        *cached = Some(token.clone());

        Ok(token)
    }

    async fn exchange(&self) -> Result<AccessToken, AuthError> {
        let mut attempt = 1;

        loop {
            match self.issuer.issue(&self.credentials).await {
                Ok(token) => {
                    debug!(expires_at = %token.expires_at(), "acquired access token");
                    return Ok(token);
                }
                Err(err) if err.is_transient() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.backoff(attempt);
                    warn!(attempt, ?delay, %err, "token exchange failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
