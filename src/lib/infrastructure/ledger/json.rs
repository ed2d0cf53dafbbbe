//! JSON file ledger

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, info};

use crate::domain::{
    campaign::RunSummary,
    ledger::{Ledger, LedgerError, OutcomeStatus, SendOutcome},
    recipients::EmailAddress,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    outcomes: Vec<SendOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<RunSummary>,
}

/// Ledger kept as a single JSON document holding the outcomes of every run
/// and the summary of the latest one.
///
/// The whole document is rewritten on each sent or failed outcome and on each
/// summary: it is written to `.tmp_{file name}` next to the ledger, flushed
/// to disk, then renamed over the ledger, so the file on disk is always a
/// complete document. Skipped outcomes only join the in-memory document and
/// reach the disk with the next write.
#[derive(Debug)]
pub struct JsonLedger {
    path: PathBuf,
    document: Mutex<LedgerDocument>,
}

impl JsonLedger {
    /// Opens the ledger at `path`.
    ///
    /// # Returns
    /// - [`Ok`] with an empty ledger if the file does not exist yet.
    /// - [`Err`] with [`LedgerError::Corrupt`] if the file is not a ledger
    ///   document, rather than starting over and sending to everyone again.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();

        let document = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => LedgerDocument::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| LedgerError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => LedgerDocument::default(),
            Err(source) => return Err(LedgerError::Io { path, source }),
        };

        info!(
            path = %path.display(),
            outcomes = document.outcomes.len(),
            "ledger opened"
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Location of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.path.with_file_name(format!(".tmp_{name}"))
    }

    async fn persist(&self, document: &LedgerDocument) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|err| LedgerError::UnknownError(anyhow!(err)))?;

        let temp_path = self.temp_path();
        let io_error = |source| LedgerError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = fs::File::create(&temp_path).await.map_err(io_error)?;
        file.write_all(&bytes).await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);

        fs::rename(&temp_path, &self.path).await.map_err(io_error)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "ledger written");

        Ok(())
    }
}

#[async_trait]
impl Ledger for JsonLedger {
    async fn record(&self, outcome: &SendOutcome) -> Result<(), LedgerError> {
        let mut document = self.document.lock().await;

        document.outcomes.push(outcome.clone());

        if let Err(err) = self.persist(&document).await {
            document.outcomes.pop();
            return Err(err);
        }

        Ok(())
    }

    async fn record_skipped(&self, outcome: &SendOutcome) -> Result<(), LedgerError> {
        self.document.lock().await.outcomes.push(outcome.clone());

        Ok(())
    }

    async fn has_outcome(&self, recipient: &EmailAddress) -> Result<bool, LedgerError> {
        let document = self.document.lock().await;

        Ok(document
            .outcomes
            .iter()
            .any(|outcome| &outcome.recipient == recipient))
    }

    async fn load_existing(&self) -> Result<HashSet<EmailAddress>, LedgerError> {
        let document = self.document.lock().await;

        Ok(document
            .outcomes
            .iter()
            .filter(|outcome| outcome.status == OutcomeStatus::Sent)
            .map(|outcome| outcome.recipient.clone())
            .collect())
    }

    async fn record_summary(&self, summary: &RunSummary) -> Result<(), LedgerError> {
        let mut document = self.document.lock().await;

        let previous = document.summary.replace(summary.clone());

        if let Err(err) = self.persist(&document).await {
            document.summary = previous;
            return Err(err);
        }

        Ok(())
    }
}
