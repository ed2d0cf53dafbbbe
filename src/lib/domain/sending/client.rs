//! Send client

use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use crate::domain::{
    auth::{AccessToken, TokenIssuer, TokenProvider},
    campaign::Shutdown,
    messages::MessagePayload,
};

use super::{Delivery, MailTransport, RetryPolicy, SendFailure};

/// Sends one message per call, applying the retry policy.
///
/// - 2xx: sent.
/// - 401: the token is refreshed once and the request repeated without using
///   up an attempt. A failed refresh or a second 401 ends the recipient.
/// - 429, throttling bodies, 5xx and network errors: wait and retry until the
///   attempts run out. A `Retry-After` hint replaces the computed backoff.
/// - Any other status: failed without retrying.
pub struct SendClient<T, I>
where
    T: MailTransport,
    I: TokenIssuer,
{
    transport: Arc<T>,
    tokens: Arc<TokenProvider<I>>,
    retry: RetryPolicy,
}

impl<T, I> fmt::Debug for SendClient<T, I>
where
    T: MailTransport,
    I: TokenIssuer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendClient")
            .field("tokens", &self.tokens)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl<T, I> SendClient<T, I>
where
    T: MailTransport,
    I: TokenIssuer,
{
    /// Create a new send client
    pub fn new(transport: Arc<T>, tokens: Arc<TokenProvider<I>>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            tokens,
            retry,
        }
    }

    /// Sends `payload` to its single recipient.
    ///
    /// API errors never escape as [`Err`]: every answer ends up as a [`Delivery`].
    /// Returns [`None`] when `shutdown` is requested while waiting to retry;
    /// the recipient then has no outcome yet.
    pub async fn send(
        &self,
        payload: &MessagePayload,
        shutdown: &mut Shutdown,
    ) -> Option<Delivery> {
        let mut attempt: u32 = 1;
        let mut requests: u32 = 0;
        let mut refreshed = false;

        let mut token = match self.current_token().await {
            Ok(token) => token,
            Err(reason) => return Some(Delivery::Failed { reason, attempts: 0 }),
        };

        loop {
            requests += 1;

            let (failure, retry_after) = match self.transport.send(&token, payload).await {
                Ok(response) if response.is_success() => {
                    debug!(recipient = %payload.to, status = response.status, requests, "message accepted");
                    return Some(Delivery::Sent {
                        status: response.status,
                        attempts: requests,
                    });
                }
                Ok(response) if response.status == 401 && !refreshed => {
                    warn!(recipient = %payload.to, "access token refused, refreshing");
                    refreshed = true;

                    match self.tokens.refresh().await {
                        Ok(fresh) => {
                            token = fresh;
                            continue;
                        }
                        Err(err) => {
                            return Some(Delivery::Failed {
                                reason: SendFailure::Unauthorized {
                                    status: Some(response.status),
                                    detail: err.to_string(),
                                },
                                attempts: requests,
                            });
                        }
                    }
                }
                Ok(response) if response.is_throttled() => (
                    SendFailure::Throttled {
                        status: response.status,
                        detail: response.body,
                    },
                    response.retry_after,
                ),
                Ok(response) if response.is_server_error() => (
                    SendFailure::ServerError {
                        status: response.status,
                        detail: response.body,
                    },
                    response.retry_after,
                ),
                Ok(response) if response.status == 401 => {
                    return Some(Delivery::Failed {
                        reason: SendFailure::Unauthorized {
                            status: Some(response.status),
                            detail: response.body,
                        },
                        attempts: requests,
                    });
                }
                Ok(response) => {
                    return Some(Delivery::Failed {
                        reason: SendFailure::Rejected {
                            status: response.status,
                            detail: response.body,
                        },
                        attempts: requests,
                    });
                }
                Err(err) => (SendFailure::Network(err.to_string()), None),
            };

            if !self.retry.should_retry(attempt) {
                warn!(recipient = %payload.to, attempt, %failure, "giving up");
                return Some(Delivery::Failed {
                    reason: failure,
                    attempts: requests,
                });
            }

            let delay = retry_after.unwrap_or_else(|| self.retry.backoff(attempt));
            warn!(recipient = %payload.to, attempt, ?delay, %failure, "send failed, retrying");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.requested() => {
                    warn!(recipient = %payload.to, "shutdown requested, abandoning retry");
                    return None;
                }
            }
            attempt += 1;

            token = match self.current_token().await {
                Ok(token) => token,
                Err(reason) => {
                    return Some(Delivery::Failed {
                        reason,
                        attempts: requests,
                    });
                }
            };
        }
    }

    async fn current_token(&self) -> Result<AccessToken, SendFailure> {
        self.tokens
            .get_token()
            .await
            .map_err(|err| SendFailure::Unauthorized {
                status: None,
                detail: err.to_string(),
            })
    }
}
