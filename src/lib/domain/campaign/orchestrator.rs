//! Campaign orchestrator

use std::{fmt, sync::Arc, time::Duration};

use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    auth::TokenIssuer,
    ledger::{Ledger, LedgerError, SendOutcome},
    messages::{compose, Attachment, MessageTemplate},
    recipients::EmailAddress,
    sending::{Delivery, MailTransport, SendClient},
};

use super::{RunReport, RunSummary, Shutdown};

/// Pacing of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampaignSettings {
    /// Pause between two sends.
    ///
    /// Default: 5 seconds
    pub delay: Duration,

    /// Extra pause after a recipient failed because the API was throttling.
    ///
    /// Default: 30 seconds
    pub throttle_cooldown: Duration,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            throttle_cooldown: Duration::from_secs(30),
        }
    }
}

/// Sends the run's message to each recipient in order, one at a time.
///
/// Recipients the ledger already holds as sent are skipped. The outcome of
/// every send is durable in the ledger before the next recipient starts; skips
/// are stored along with the next write. A failed recipient never stops the
/// run; only a ledger failure does.
pub struct Campaign<T, I, L>
where
    T: MailTransport,
    I: TokenIssuer,
    L: Ledger,
{
    client: SendClient<T, I>,
    ledger: Arc<L>,
    template: MessageTemplate,
    attachment: Option<Arc<Attachment>>,
    settings: CampaignSettings,
}

impl<T, I, L> fmt::Debug for Campaign<T, I, L>
where
    T: MailTransport,
    I: TokenIssuer,
    L: Ledger,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Campaign")
            .field("client", &self.client)
            .field("template", &self.template.subject)
            .field("attachment", &self.attachment)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<T, I, L> Campaign<T, I, L>
where
    T: MailTransport,
    I: TokenIssuer,
    L: Ledger,
{
    /// Create a new campaign
    pub fn new(
        client: SendClient<T, I>,
        ledger: Arc<L>,
        template: MessageTemplate,
        attachment: Option<Arc<Attachment>>,
        settings: CampaignSettings,
    ) -> Self {
        Self {
            client,
            ledger,
            template,
            attachment,
            settings,
        }
    }

    /// Runs the campaign over `recipients`.
    ///
    /// # Returns
    /// - [`Ok`] with the [`RunReport`], also when some recipients failed or the
    ///   run was interrupted.
    /// - [`Err`] with a [`LedgerError`] if an outcome could not be persisted.
    pub async fn run(
        &self,
        recipients: &[EmailAddress],
        mut shutdown: Shutdown,
    ) -> Result<RunReport, LedgerError> {
        let started = Instant::now();
        let run_id = Uuid::now_v7();

        let already_sent = self.ledger.load_existing().await?;

        let total = recipients.len();
        let mut remaining = recipients
            .iter()
            .filter(|recipient| !already_sent.contains(recipient))
            .count();

        info!(%run_id, total, to_send = remaining, "starting run");

        let mut outcomes = Vec::with_capacity(total);
        let mut interrupted = false;

        for (index, recipient) in recipients.iter().enumerate() {
            let position = index + 1;

            if shutdown.is_requested() {
                warn!(processed = index, "shutdown requested, stopping");
                interrupted = true;
                break;
            }

            if already_sent.contains(recipient) {
                info!("[{position}/{total}] {recipient} already sent, skipping");

                let outcome = SendOutcome::skipped(run_id, recipient.clone());
                self.ledger.record_skipped(&outcome).await?;
                outcomes.push(outcome);
                continue;
            }

            info!("[{position}/{total}] sending to {recipient}");

            let payload = compose(&self.template, recipient, self.attachment.as_ref());
            let Some(delivery) = self.client.send(&payload, &mut shutdown).await else {
                warn!(processed = index, "shutdown requested, stopping");
                interrupted = true;
                break;
            };

            let throttled = match &delivery {
                Delivery::Sent { attempts, .. } => {
                    info!(attempts, "[{position}/{total}] {recipient} sent");
                    false
                }
                Delivery::Failed { reason, attempts } => {
                    warn!(attempts, "[{position}/{total}] {recipient} failed: {reason}");
                    reason.is_throttled()
                }
            };

            let outcome = SendOutcome::from_delivery(run_id, recipient.clone(), &delivery);
            self.ledger.record(&outcome).await?;
            outcomes.push(outcome);

            remaining -= 1;
            if remaining == 0 {
                continue;
            }

            let mut pause = self.settings.delay;
            if throttled {
                warn!(
                    cooldown = ?self.settings.throttle_cooldown,
                    "throttling detected, cooling down before next recipient"
                );
                pause += self.settings.throttle_cooldown;
            }

            if pause.is_zero() {
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = shutdown.requested() => {
                    warn!(processed = position, "shutdown requested, stopping");
                    interrupted = true;
                    break;
                }
            }
        }

        let summary = RunSummary::from_outcomes(run_id, &outcomes, started.elapsed(), interrupted);
        self.ledger.record_summary(&summary).await?;

        info!(
            %run_id,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed = ?summary.total_elapsed(),
            interrupted,
            "run finished"
        );

        Ok(RunReport { summary, outcomes })
    }
}
