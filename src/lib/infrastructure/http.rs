//! Shared HTTP client

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the client used for every outbound request.
///
/// `timeout` bounds each request from connection to the end of the body.
pub fn build_client(timeout: Duration) -> Result<Client> {
    reqwest::ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}
