//! Send outcome

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{recipients::EmailAddress, sending::Delivery};

/// What happened to a recipient in a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The API accepted the message
    Sent,

    /// The message was not delivered
    Failed,

    /// Not sent because an earlier run already delivered it
    Skipped,
}

/// The finalized record for one recipient of one run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    /// Run that produced the outcome
    pub run_id: Uuid,

    /// The recipient
    pub recipient: EmailAddress,

    /// What happened
    pub status: OutcomeStatus,

    /// HTTP status of the last response, if any
    pub http_status: Option<u16>,

    /// Failure detail, if any
    pub error: Option<String>,

    /// When the outcome was finalized
    pub timestamp: DateTime<Utc>,

    /// Requests issued for the recipient
    pub attempt_count: u32,
}

impl SendOutcome {
    /// Record the result of a send
    pub fn from_delivery(run_id: Uuid, recipient: EmailAddress, delivery: &Delivery) -> Self {
        let (status, error) = match delivery {
            Delivery::Sent { .. } => (OutcomeStatus::Sent, None),
            Delivery::Failed { reason, .. } => (OutcomeStatus::Failed, Some(reason.to_string())),
        };

        Self {
            run_id,
            recipient,
            status,
            http_status: delivery.http_status(),
            error,
            timestamp: Utc::now(),
            attempt_count: delivery.attempts(),
        }
    }

    /// Record a recipient left out because it was already sent
    pub fn skipped(run_id: Uuid, recipient: EmailAddress) -> Self {
        Self {
            run_id,
            recipient,
            status: OutcomeStatus::Skipped,
            http_status: None,
            error: None,
            timestamp: Utc::now(),
            attempt_count: 0,
        }
    }
}
