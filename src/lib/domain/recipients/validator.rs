//! Address validation port

use std::collections::HashSet;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{AddressValidatorError, EmailAddress};

/// A third-party service that screens out disposable or undeliverable addresses
#[async_trait]
pub trait AddressValidator: Send + Sync + 'static {
    /// Validates a batch of format-valid addresses.
    ///
    /// # Arguments
    /// * `batch` - The addresses to check.
    ///
    /// # Returns
    /// - [`Ok`] with the subset of `batch` the service accepts.
    /// - [`Err`] with an [`AddressValidatorError`] if the service could not give a verdict.
    async fn validate(
        &self,
        batch: &[EmailAddress],
    ) -> Result<HashSet<EmailAddress>, AddressValidatorError>;
}

#[cfg(test)]
mock! {
    pub AddressValidator {}

    #[async_trait]
    impl AddressValidator for AddressValidator {
        async fn validate(&self, batch: &[EmailAddress]) -> Result<HashSet<EmailAddress>, AddressValidatorError>;
    }
}
