//! Shutdown requests observed between requests

use tokio::sync::watch;

/// Receiving end of a shutdown request.
///
/// A run checks it before each recipient, while pausing between sends and
/// while waiting to retry a send, never while a request is in flight. A
/// recipient abandoned during a retry wait gets no ledger entry and is sent
/// again by the next run.
#[derive(Clone, Debug)]
pub struct Shutdown(Option<watch::Receiver<bool>>);

impl Shutdown {
    /// Stop when `true` is published on the channel
    pub fn new(receiver: watch::Receiver<bool>) -> Self {
        Self(Some(receiver))
    }

    /// Never stop
    pub fn never() -> Self {
        Self(None)
    }

    /// Whether a shutdown was requested
    pub fn is_requested(&self) -> bool {
        self.0.as_ref().is_some_and(|receiver| *receiver.borrow())
    }

    /// Resolves once a shutdown is requested
    pub async fn requested(&mut self) {
        if let Some(receiver) = self.0.as_mut() {
            if receiver.wait_for(|stop| *stop).await.is_ok() {
                return;
            }
        }

        std::future::pending::<()>().await
    }
}
