//! Application credentials

use std::fmt;

use crate::domain::recipients::EmailAddress;

/// A client secret which never shows up in logs
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Wrap a raw client secret
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The secret value, for the token request only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClientSecret {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

/// Credentials of the application registration, loaded once at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// Directory (tenant) ID
    pub tenant_id: String,

    /// Application (client) ID
    pub client_id: String,

    /// Client secret
    pub client_secret: ClientSecret,

    /// Mailbox the messages are sent from
    pub sender: EmailAddress,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_client_secret_display_obfuscates() {
        let secret = ClientSecret::new("s3cr3t");

        assert_eq!(format!("{}", secret), "********");
        assert_eq!(secret.expose(), "s3cr3t");
    }

    #[test]
    fn test_credentials_debug_hides_secret() -> TestResult {
        let credentials = Credentials {
            tenant_id: "tenant".to_string(),
            client_id: "client".to_string(),
            client_secret: ClientSecret::new("s3cr3t"),
            sender: EmailAddress::new("sender@example.com")?,
        };

        let debug = format!("{:?}", credentials);

        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("********"));

        Ok(())
    }
}
