//! Ledger module: durable per-recipient outcomes enabling safe resume.

mod errors;
mod outcome;
mod repository;

pub use errors::LedgerError;
pub use outcome::{OutcomeStatus, SendOutcome};
pub use repository::Ledger;

#[cfg(test)]
pub mod tests {
    pub use super::repository::MockLedger;
}
