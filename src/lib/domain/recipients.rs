//! Recipients module: addresses, the recipients file and optional validation.

mod email_address;
mod errors;
mod loader;
mod validator;

pub use email_address::{EmailAddress, EmailAddressError};
pub use errors::{AddressValidatorError, RecipientsError};
pub use loader::{LoadStats, RecipientLoader, VALIDATION_BATCH_SIZE};
pub use validator::AddressValidator;

#[cfg(test)]
pub mod tests {
    pub use super::validator::MockAddressValidator;
}
