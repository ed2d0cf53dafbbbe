//! Run summary

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    ledger::{OutcomeStatus, SendOutcome},
    recipients::EmailAddress,
};

/// Counts for one run, always derived from its outcomes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The run
    pub run_id: Uuid,

    /// Recipients the API accepted
    pub sent: usize,

    /// Recipients that could not be delivered
    pub failed: usize,

    /// Recipients already sent by an earlier run
    pub skipped: usize,

    /// Wall-clock duration of the run in seconds
    pub total_elapsed_secs: f64,

    /// Whether the run stopped early on a shutdown request
    pub interrupted: bool,

    /// When the run ended
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Tally `outcomes` of run `run_id`
    pub fn from_outcomes(
        run_id: Uuid,
        outcomes: &[SendOutcome],
        total_elapsed: Duration,
        interrupted: bool,
    ) -> Self {
        let count = |status: OutcomeStatus| {
            outcomes
                .iter()
                .filter(|outcome| outcome.status == status)
                .count()
        };

        Self {
            run_id,
            sent: count(OutcomeStatus::Sent),
            failed: count(OutcomeStatus::Failed),
            skipped: count(OutcomeStatus::Skipped),
            total_elapsed_secs: total_elapsed.as_secs_f64(),
            interrupted,
            finished_at: Utc::now(),
        }
    }

    /// Wall-clock duration of the run
    pub fn total_elapsed(&self) -> Duration {
        Duration::try_from_secs_f64(self.total_elapsed_secs).unwrap_or_default()
    }
}

/// Everything a run produced
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// The counts
    pub summary: RunSummary,

    /// One outcome per processed recipient, in processing order
    pub outcomes: Vec<SendOutcome>,
}

impl RunReport {
    /// Recipients that failed in this run, in processing order
    pub fn failed_recipients(&self) -> impl Iterator<Item = &EmailAddress> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == OutcomeStatus::Failed)
            .map(|outcome| &outcome.recipient)
    }
}
