//! Send results

use thiserror::Error;

/// Why a message could not be delivered
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SendFailure {
    /// The API kept throttling requests
    #[error("throttled ({status}): {detail}")]
    Throttled {
        /// HTTP status code
        status: u16,

        /// Response body
        detail: String,
    },

    /// The API kept failing with a server error
    #[error("server error ({status}): {detail}")]
    ServerError {
        /// HTTP status code
        status: u16,

        /// Response body
        detail: String,
    },

    /// No response could be obtained
    #[error("{0}")]
    Network(String),

    /// The API refused the message, retrying will not help
    #[error("rejected ({status}): {detail}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Response body
        detail: String,
    },

    /// No valid token could be obtained, or a fresh one was refused too
    #[error("unauthorized: {detail}")]
    Unauthorized {
        /// HTTP status code, when the API answered
        status: Option<u16>,

        /// Error detail
        detail: String,
    },
}

impl SendFailure {
    /// The HTTP status code of the last response, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SendFailure::Throttled { status, .. }
            | SendFailure::ServerError { status, .. }
            | SendFailure::Rejected { status, .. } => Some(*status),
            SendFailure::Unauthorized { status, .. } => *status,
            SendFailure::Network(_) => None,
        }
    }

    /// Whether the API was throttling when the attempts ran out
    pub fn is_throttled(&self) -> bool {
        matches!(self, SendFailure::Throttled { .. })
    }
}

/// Final result of sending to one recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The API accepted the message
    Sent {
        /// HTTP status code
        status: u16,

        /// Requests issued, the successful one included
        attempts: u32,
    },

    /// The message was not delivered
    Failed {
        /// Why the message was not delivered
        reason: SendFailure,

        /// Requests issued
        attempts: u32,
    },
}

impl Delivery {
    /// Whether the API accepted the message
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent { .. })
    }

    /// Requests issued for this recipient
    pub fn attempts(&self) -> u32 {
        match self {
            Delivery::Sent { attempts, .. } | Delivery::Failed { attempts, .. } => *attempts,
        }
    }

    /// HTTP status code of the last response, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Delivery::Sent { status, .. } => Some(*status),
            Delivery::Failed { reason, .. } => reason.http_status(),
        }
    }
}
