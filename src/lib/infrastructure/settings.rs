//! Run settings

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    domain::{campaign::CampaignSettings, sending::RetryPolicy},
    infrastructure::disify::DEFAULT_DISIFY_URL,
};

/// Files, pacing and retry settings of a run
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct DeliveryConfig {
    /// Recipients file, one address per line
    #[clap(long, env = "RECIPIENTS_FILE", default_value = "recipients.txt")]
    pub recipients_file: PathBuf,

    /// Ledger file recording every outcome
    #[clap(long, env = "LEDGER_FILE", default_value = "send_results.json")]
    pub ledger_file: PathBuf,

    /// Where to write the addresses that failed in this run, if anywhere
    #[clap(long, env = "FAILED_RECIPIENTS_FILE")]
    pub failed_recipients_file: Option<PathBuf>,

    /// Pause between two sends, in seconds
    #[clap(long, env = "SEND_DELAY_SECONDS", default_value = "5")]
    pub send_delay_seconds: u64,

    /// Attempts per recipient, the first one included
    #[clap(
        long,
        env = "MAX_ATTEMPTS",
        default_value = "3",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Wait after the first failed attempt, in seconds
    #[clap(long, env = "BACKOFF_BASE_SECONDS", default_value = "2")]
    pub backoff_base_seconds: u64,

    /// Upper bound for any computed wait, in seconds
    #[clap(long, env = "BACKOFF_CAP_SECONDS", default_value = "60")]
    pub backoff_cap_seconds: u64,

    /// Extra pause after a recipient failed on throttling, in seconds
    #[clap(long, env = "THROTTLE_COOLDOWN_SECONDS", default_value = "30")]
    pub throttle_cooldown_seconds: u64,

    /// Screen recipients through the address validation service
    #[clap(long, env = "VALIDATE_RECIPIENTS")]
    pub validate_recipients: bool,

    /// Base URL of the address validation service
    #[clap(long, env = "VALIDATOR_URL", default_value = DEFAULT_DISIFY_URL)]
    pub validator_url: String,

    /// Timeout of each HTTP request, in seconds
    #[clap(long, env = "HTTP_TIMEOUT_SECONDS", default_value = "30")]
    pub http_timeout_seconds: u64,
}

/// Loads `.env` from the working directory or one of its parents.
///
/// # Returns
/// - [`Ok`] with the loaded file, or [`None`] if there is no `.env` file.
/// - [`Err`] if a `.env` file exists but cannot be read or parsed.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    ignore_missing(dotenvy::dotenv())
}

fn ignore_missing<T>(result: Result<T, dotenvy::Error>) -> Result<Option<T>, dotenvy::Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

impl DeliveryConfig {
    /// Retry policy applied to each send
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.backoff_base_seconds),
            Duration::from_secs(self.backoff_cap_seconds),
        )
    }

    /// Pacing between recipients
    pub fn campaign_settings(&self) -> CampaignSettings {
        CampaignSettings {
            delay: Duration::from_secs(self.send_delay_seconds),
            throttle_cooldown: Duration::from_secs(self.throttle_cooldown_seconds),
        }
    }

    /// Timeout of each HTTP request
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_arguments_map_to_policies() -> TestResult {
        let config = DeliveryConfig::try_parse_from([
            "graph-mailer",
            "--send-delay-seconds",
            "1",
            "--max-attempts",
            "5",
            "--backoff-base-seconds",
            "3",
            "--backoff-cap-seconds",
            "20",
            "--throttle-cooldown-seconds",
            "10",
        ])?;

        assert_eq!(
            config.retry_policy(),
            RetryPolicy::new(5, Duration::from_secs(3), Duration::from_secs(20))
        );
        assert_eq!(
            config.campaign_settings(),
            CampaignSettings {
                delay: Duration::from_secs(1),
                throttle_cooldown: Duration::from_secs(10),
            }
        );

        Ok(())
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = DeliveryConfig::try_parse_from(["graph-mailer", "--max-attempts", "0"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_env_file_ignored() -> TestResult {
        let dir = TempDir::new()?;

        let loaded = ignore_missing(dotenvy::from_path(dir.path().join(".env")))?;

        assert_eq!(loaded, None);

        Ok(())
    }

    #[test]
    fn test_malformed_env_file_reported() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join(".env");
        std::fs::write(&path, "GRAPH_MAILER_UNUSED A B\nGRAPH_MAILER_OTHER=1\n")?;

        let result = ignore_missing(dotenvy::from_path(&path));

        assert!(result.is_err());

        Ok(())
    }
}
