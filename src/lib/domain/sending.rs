//! Sending module: one authenticated request per recipient, retried on throttling.

mod client;
mod delivery;
mod retry;
mod transport;

pub use client::SendClient;
pub use delivery::{Delivery, SendFailure};
pub use retry::RetryPolicy;
pub use transport::{MailTransport, TransportError, TransportResponse};

#[cfg(test)]
pub mod tests {
    pub use super::transport::MockMailTransport;
}
