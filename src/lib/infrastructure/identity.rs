//! Microsoft identity platform token issuer

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use clap::Parser;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::auth::{AccessToken, AuthError, ClientSecret, Credentials, TokenIssuer};

/// Scope granting the application permissions configured for Microsoft Graph
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Application registration in Microsoft Entra ID
#[derive(Clone, Debug, Parser)]
pub struct IdentityConfig {
    /// Directory (tenant) ID
    #[clap(long, env = "TENANT_ID")]
    pub tenant_id: String,

    /// Application (client) ID
    #[clap(long, env = "CLIENT_ID")]
    pub client_id: String,

    /// Client secret
    #[clap(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: ClientSecret,

    /// Base URL of the identity platform
    #[clap(
        long,
        env = "AUTHORITY_URL",
        default_value = "https://login.microsoftonline.com"
    )]
    pub authority_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,

    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN_SECS
}

#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Performs the OAuth2 client-credentials exchange against the identity platform
#[derive(Clone, Debug)]
pub struct MicrosoftIdentity {
    client: Client,
    authority_url: String,
}

impl MicrosoftIdentity {
    /// Create a new issuer talking to `authority_url`
    pub fn new(client: Client, authority_url: impl Into<String>) -> Self {
        Self {
            client,
            authority_url: authority_url.into(),
        }
    }

    fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/'),
            tenant_id
        )
    }
}

#[async_trait]
impl TokenIssuer for MicrosoftIdentity {
    async fn issue(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        let response = self
            .client
            .post(self.token_url(&credentials.tenant_id))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.expose()),
                ("scope", GRAPH_SCOPE),
            ])
            .send()
            .await
            .map_err(|err| AuthError::Unavailable(err.to_string()))?;

        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response
                .json()
                .await
                .map_err(|err| AuthError::UnknownError(anyhow!("invalid token response: {err}")))?;

            debug!(expires_in = token.expires_in, "access token issued");

            return Ok(AccessToken::expiring_in(
                token.access_token,
                Duration::from_secs(token.expires_in),
            ));
        }

        let body = response.text().await.unwrap_or_default();
        let error: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        let detail = error.error_description.or(error.error).unwrap_or(body);

        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            Err(AuthError::CredentialsRejected(detail))
        } else {
            Err(AuthError::Unavailable(format!("{status}: {detail}")))
        }
    }
}
