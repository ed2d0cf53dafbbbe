#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends one email per recipient through Microsoft Graph, with retry, token
//! refresh, recipient validation and a resumable send ledger.

pub mod domain;
pub mod infrastructure;
