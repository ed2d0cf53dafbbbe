//! Ledger repository

use std::collections::HashSet;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::{campaign::RunSummary, recipients::EmailAddress};

use super::{LedgerError, SendOutcome};

/// Durable store of send outcomes.
///
/// A recorded outcome must be durable when [`Ledger::record`] returns, so a run
/// interrupted after it can resume without sending twice.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
    /// Append a finalized outcome
    async fn record(&self, outcome: &SendOutcome) -> Result<(), LedgerError>;

    /// Append a `skipped` outcome.
    ///
    /// Nothing was sent, so it need not be durable on return: it is stored
    /// with the next [`Ledger::record`] or [`Ledger::record_summary`].
    async fn record_skipped(&self, outcome: &SendOutcome) -> Result<(), LedgerError>;

    /// Whether any outcome, whatever its status, exists for `recipient`
    async fn has_outcome(&self, recipient: &EmailAddress) -> Result<bool, LedgerError>;

    /// Recipients already sent by this or any earlier run
    async fn load_existing(&self) -> Result<HashSet<EmailAddress>, LedgerError>;

    /// Store the summary of the run that just ended
    async fn record_summary(&self, summary: &RunSummary) -> Result<(), LedgerError>;
}

#[cfg(test)]
mock! {
    pub Ledger {}

    #[async_trait]
    impl Ledger for Ledger {
        async fn record(&self, outcome: &SendOutcome) -> Result<(), LedgerError>;
        async fn record_skipped(&self, outcome: &SendOutcome) -> Result<(), LedgerError>;
        async fn has_outcome(&self, recipient: &EmailAddress) -> Result<bool, LedgerError>;
        async fn load_existing(&self) -> Result<HashSet<EmailAddress>, LedgerError>;
        async fn record_summary(&self, summary: &RunSummary) -> Result<(), LedgerError>;
    }
}
