//! Recipient loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading the recipients file
#[derive(Debug, Error)]
pub enum RecipientsError {
    /// The recipients file could not be read
    #[error("could not read recipients file {}", path.display())]
    Unreadable {
        /// Path of the recipients file
        path: PathBuf,

        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by an address validation service
#[derive(Debug, Error)]
pub enum AddressValidatorError {
    /// The service could not be reached or answered with an error
    #[error("address validation service unavailable: {0}")]
    Unavailable(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
