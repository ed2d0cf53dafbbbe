//! Domain logic, independent of the HTTP services and files it runs against

pub mod auth;
pub mod campaign;
pub mod ledger;
pub mod messages;
pub mod recipients;
pub mod sending;
