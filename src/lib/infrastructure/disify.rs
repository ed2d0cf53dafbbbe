//! Disify address validation service

use std::collections::HashSet;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::recipients::{AddressValidator, AddressValidatorError, EmailAddress};

/// Public Disify endpoint
pub const DEFAULT_DISIFY_URL: &str = "https://www.disify.com";

#[derive(Debug, Deserialize)]
struct MassValidation {
    session: Option<String>,

    #[serde(default)]
    valid: usize,

    #[serde(default)]
    disposable: usize,

    #[serde(default)]
    invalid_dns: usize,
}

/// Screens out disposable and undeliverable addresses with the Disify mass API.
///
/// A batch is submitted to `/api/email/{a,b,c}/mass`, and the accepted
/// addresses are then listed, one per line, by `/api/view/{session}`.
#[derive(Clone, Debug)]
pub struct DisifyValidator {
    client: Client,
    base_url: Url,
}

impl DisifyValidator {
    /// Create a new validator talking to `base_url`
    pub fn new(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("{base_url} cannot be used as a base URL"));
        }

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }

    async fn get_text(&self, url: Url) -> Result<String, AddressValidatorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AddressValidatorError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AddressValidatorError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|err| AddressValidatorError::Unavailable(err.to_string()))
    }
}

#[async_trait]
impl AddressValidator for DisifyValidator {
    async fn validate(
        &self,
        batch: &[EmailAddress],
    ) -> Result<HashSet<EmailAddress>, AddressValidatorError> {
        if batch.is_empty() {
            return Ok(HashSet::new());
        }

        let joined = batch
            .iter()
            .map(EmailAddress::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let body = self.get_text(self.endpoint(&["api", "email", &joined, "mass"])).await?;
        let validation: MassValidation = serde_json::from_str(&body)
            .map_err(|err| AddressValidatorError::Unavailable(format!("invalid response: {err}")))?;

        debug!(
            batch = batch.len(),
            valid = validation.valid,
            disposable = validation.disposable,
            invalid_dns = validation.invalid_dns,
            "batch validated"
        );

        let Some(session) = validation.session else {
            return Ok(HashSet::new());
        };

        let listing = self.get_text(self.endpoint(&["api", "view", &session])).await?;
        let submitted: HashSet<&EmailAddress> = batch.iter().collect();

        Ok(listing
            .lines()
            .filter_map(|line| EmailAddress::new(line).ok())
            .filter(|address| submitted.contains(address))
            .collect())
    }
}
