//! Mail transport port

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::mock;

use crate::domain::{auth::AccessToken, messages::MessagePayload};

const THROTTLED_MARKER: &str = "ApplicationThrottled";

/// What the mail API answered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Wait requested by the API, if any
    pub retry_after: Option<Duration>,

    /// Response body, kept for error reporting
    pub body: String,
}

impl TransportResponse {
    /// Create a response with an empty body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            retry_after: None,
            body: String::new(),
        }
    }

    /// Set the wait requested by the API
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Set the response body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429, or any response whose body reports application throttling
    pub fn is_throttled(&self) -> bool {
        self.status == 429 || self.body.contains(THROTTLED_MARKER)
    }

    /// 5xx
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Errors that prevented getting any response from the mail API
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// The mail API, one request per message
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Submits `payload` authenticated with `token`.
    ///
    /// # Returns
    /// - [`Ok`] with the [`TransportResponse`] for any HTTP answer, error statuses included.
    /// - [`Err`] with a [`TransportError`] when no answer was received.
    async fn send(
        &self,
        token: &AccessToken,
        payload: &MessagePayload,
    ) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn send(&self, token: &AccessToken, payload: &MessagePayload) -> Result<TransportResponse, TransportError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert!(TransportResponse::new(202).is_success());
        assert!(TransportResponse::new(503).is_server_error());
        assert!(TransportResponse::new(429).is_throttled());
        assert!(!TransportResponse::new(400).is_throttled());
    }

    #[test]
    fn test_throttling_detected_from_body() {
        let response = TransportResponse::new(503)
            .with_body(r#"{"error":{"code":"ApplicationThrottled","message":"slow down"}}"#);

        assert!(response.is_throttled());
    }
}
