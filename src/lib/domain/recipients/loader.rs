//! Recipients file loader

use std::{collections::HashSet, fmt, path::Path, sync::Arc};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AddressValidator, EmailAddress, RecipientsError};

/// Maximum number of addresses sent to the validation service in one request
pub const VALIDATION_BATCH_SIZE: usize = 500;

const COMMENT_MARKER: char = '#';

/// Statistics gathered while loading a recipients file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Lines read from the file, including blank and comment lines
    pub total_lines: usize,

    /// Addresses dropped because they were already seen earlier in the file
    pub duplicates_removed: usize,

    /// Lines that did not contain a valid address
    pub format_invalid: usize,

    /// Addresses rejected by the validation service
    pub validator_rejected: usize,

    /// Addresses kept on format alone because the validation service was unavailable
    pub validator_unavailable: usize,
}

/// Loads, normalizes, deduplicates and optionally validates recipients
#[derive(Clone, Default)]
pub struct RecipientLoader {
    validator: Option<Arc<dyn AddressValidator>>,
}

impl fmt::Debug for RecipientLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipientLoader")
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl RecipientLoader {
    /// Create a loader that only checks address format
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that also screens addresses through `validator`
    pub fn with_validator(validator: Arc<dyn AddressValidator>) -> Self {
        Self {
            validator: Some(validator),
        }
    }

    /// Loads the recipients file at `path`.
    ///
    /// # Returns
    /// - [`Ok`] with the recipients in first-seen file order and the [`LoadStats`].
    /// - [`Err`] with a [`RecipientsError`] if the file cannot be read. Invalid
    ///   entries never fail the load, they are counted instead.
    pub async fn load(
        &self,
        path: &Path,
    ) -> Result<(Vec<EmailAddress>, LoadStats), RecipientsError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| RecipientsError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

        let loaded = self.load_from_str(&contents).await;

        info!(
            path = %path.display(),
            recipients = loaded.0.len(),
            "loaded recipients"
        );

        Ok(loaded)
    }

    /// Loads recipients from the contents of a recipients file
    pub async fn load_from_str(&self, contents: &str) -> (Vec<EmailAddress>, LoadStats) {
        let (candidates, mut stats) = parse(contents);

        let recipients = match &self.validator {
            Some(validator) => screen(validator.as_ref(), candidates, &mut stats).await,
            None => candidates,
        };

        (recipients, stats)
    }
}

fn parse(contents: &str) -> (Vec<EmailAddress>, LoadStats) {
    let mut stats = LoadStats::default();
    let mut seen = HashSet::new();
    let mut recipients = Vec::new();

    for line in contents.lines() {
        stats.total_lines += 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        match EmailAddress::extract(line) {
            Some(address) if seen.insert(address.clone()) => recipients.push(address),
            Some(address) => {
                debug!(%address, "dropping duplicate recipient");
                stats.duplicates_removed += 1;
            }
            None => {
                debug!(line, "no valid address on line");
                stats.format_invalid += 1;
            }
        }
    }

    (recipients, stats)
}

async fn screen(
    validator: &dyn AddressValidator,
    candidates: Vec<EmailAddress>,
    stats: &mut LoadStats,
) -> Vec<EmailAddress> {
    let mut accepted = Vec::with_capacity(candidates.len());

    for (index, batch) in candidates.chunks(VALIDATION_BATCH_SIZE).enumerate() {
        match validator.validate(batch).await {
            Ok(valid) => {
                let before = accepted.len();

                for address in batch {
                    if valid.contains(address) {
                        accepted.push(address.clone());
                    } else {
                        debug!(%address, "recipient rejected by validation service");
                        stats.validator_rejected += 1;
                    }
                }

                debug!(
                    batch = index + 1,
                    size = batch.len(),
                    valid = accepted.len() - before,
                    "validated batch"
                );
            }
            Err(err) => {
                warn!(
                    batch = index + 1,
                    size = batch.len(),
                    %err,
                    "validation service unavailable, keeping format-valid addresses"
                );
                stats.validator_unavailable += batch.len();
                accepted.extend_from_slice(batch);
            }
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use testresult::TestResult;

    use crate::domain::recipients::{tests::MockAddressValidator, AddressValidatorError};

    use super::*;

    fn addresses(recipients: &[EmailAddress]) -> Vec<&str> {
        recipients.iter().map(EmailAddress::as_str).collect()
    }

    #[tokio::test]
    async fn test_duplicates_removed_preserving_first_seen_order() {
        let (recipients, stats) = RecipientLoader::new()
            .load_from_str("b@x.com\na@x.com\nb@x.com\n")
            .await;

        assert_eq!(addresses(&recipients), vec!["b@x.com", "a@x.com"]);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.total_lines, 3);
    }

    #[tokio::test]
    async fn test_duplicates_detected_case_insensitively() {
        let (recipients, stats) = RecipientLoader::new()
            .load_from_str("Jane@Example.com\njane@example.COM\n")
            .await;

        assert_eq!(addresses(&recipients), vec!["jane@example.com"]);
        assert_eq!(stats.duplicates_removed, 1);
    }

    #[tokio::test]
    async fn test_blank_and_comment_lines_ignored() {
        let contents = "# newsletter list\n\n   \na@x.com\n  # b@x.com\n";

        let (recipients, stats) = RecipientLoader::new().load_from_str(contents).await;

        assert_eq!(addresses(&recipients), vec!["a@x.com"]);
        assert_eq!(stats.total_lines, 5);
        assert_eq!(stats.format_invalid, 0);
    }

    #[tokio::test]
    async fn test_invalid_lines_counted_not_raised() {
        let contents = "a@x.com\nnot an address\nbroken@localhost\n";

        let (recipients, stats) = RecipientLoader::new().load_from_str(contents).await;

        assert_eq!(addresses(&recipients), vec!["a@x.com"]);
        assert_eq!(stats.format_invalid, 2);
    }

    #[tokio::test]
    async fn test_address_extracted_from_surrounding_text() {
        let (recipients, _) = RecipientLoader::new()
            .load_from_str("  Jane Doe <jane@example.com>  \n")
            .await;

        assert_eq!(addresses(&recipients), vec!["jane@example.com"]);
    }

    #[tokio::test]
    async fn test_validator_rejections_counted() {
        let mut validator = MockAddressValidator::new();

        validator.expect_validate().times(1).returning(|batch| {
            Ok(batch
                .iter()
                .filter(|address| !address.as_str().ends_with("@mailinator.com"))
                .cloned()
                .collect::<HashSet<_>>())
        });

        let loader = RecipientLoader::with_validator(Arc::new(validator));

        let (recipients, stats) = loader
            .load_from_str("a@x.com\nthrowaway@mailinator.com\nb@x.com\n")
            .await;

        assert_eq!(addresses(&recipients), vec!["a@x.com", "b@x.com"]);
        assert_eq!(stats.validator_rejected, 1);
        assert_eq!(stats.validator_unavailable, 0);
    }

    #[tokio::test]
    async fn test_validator_outage_falls_back_to_format_checks() {
        let mut validator = MockAddressValidator::new();

        validator
            .expect_validate()
            .times(1)
            .returning(|_| Err(AddressValidatorError::Unavailable("503".to_string())));

        let loader = RecipientLoader::with_validator(Arc::new(validator));

        let (recipients, stats) = loader.load_from_str("a@x.com\nb@x.com\n").await;

        assert_eq!(addresses(&recipients), vec!["a@x.com", "b@x.com"]);
        assert_eq!(stats.validator_unavailable, 2);
        assert_eq!(stats.validator_rejected, 0);
    }

    #[tokio::test]
    async fn test_validator_called_in_batches() {
        let contents = (0..VALIDATION_BATCH_SIZE + 1)
            .map(|i| format!("user{i}@example.com"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut validator = MockAddressValidator::new();

        validator
            .expect_validate()
            .withf(|batch| batch.len() == VALIDATION_BATCH_SIZE)
            .times(1)
            .returning(|batch| Ok(batch.iter().cloned().collect()));
        validator
            .expect_validate()
            .withf(|batch| batch.len() == 1)
            .times(1)
            .returning(|_| Err(AddressValidatorError::Unavailable("timeout".to_string())));

        let loader = RecipientLoader::with_validator(Arc::new(validator));

        let (recipients, stats) = loader.load_from_str(&contents).await;

        assert_eq!(recipients.len(), VALIDATION_BATCH_SIZE + 1);
        assert_eq!(stats.validator_unavailable, 1);
    }

    #[tokio::test]
    async fn test_load_reads_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("recipients.txt");
        std::fs::write(&path, "a@x.com\nb@x.com\n")?;

        let (recipients, stats) = RecipientLoader::new().load(&path).await?;

        assert_eq!(addresses(&recipients), vec!["a@x.com", "b@x.com"]);
        assert_eq!(stats.total_lines, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = RecipientLoader::new()
            .load(&dir.path().join("missing.txt"))
            .await;

        assert!(matches!(result, Err(RecipientsError::Unreadable { .. })));

        Ok(())
    }
}
