//! Ledger errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing the ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file could not be read or written
    #[error("could not access ledger {}", path.display())]
    Io {
        /// Path of the ledger file
        path: PathBuf,

        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The ledger file exists but is not a valid ledger document
    #[error("ledger {} is corrupt", path.display())]
    Corrupt {
        /// Path of the ledger file
        path: PathBuf,

        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
