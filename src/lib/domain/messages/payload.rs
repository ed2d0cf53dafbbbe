//! Message payload

use std::sync::Arc;

use crate::domain::recipients::EmailAddress;

use super::Attachment;

/// A message ready to be sent to a single recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagePayload {
    /// The recipient of the email
    pub to: EmailAddress,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,

    /// The plain text body of the email
    pub text_body: String,

    /// The attachment shared by every message of the run
    pub attachment: Option<Arc<Attachment>>,
}
