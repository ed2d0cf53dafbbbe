//! Ledger storage

mod export;
mod json;

pub use export::export_failed;
pub use json::JsonLedger;
