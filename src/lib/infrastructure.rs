//! Adapters binding the domain ports to Microsoft Graph, Disify and the filesystem.

pub mod disify;
pub mod graph;
pub mod http;
pub mod identity;
pub mod ledger;
pub mod settings;
pub mod signals;
pub mod templates;
