//! Access token

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};

/// A bearer token and the moment it stops being valid
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token expiring at `expires_at`
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Create a token that expires `expires_in` from now
    pub fn expiring_in(value: impl Into<String>, expires_in: Duration) -> Self {
        let lifetime = chrono::Duration::from_std(expires_in).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self::new(value, expires_at)
    }

    /// The bearer value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When the token expires
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token expires within `margin` of now
    pub fn expires_within(&self, margin: Duration) -> bool {
        let margin = chrono::Duration::from_std(margin).unwrap_or(chrono::Duration::MAX);

        match Utc::now().checked_add_signed(margin) {
            Some(deadline) => deadline >= self.expires_at,
            None => true,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"********")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
