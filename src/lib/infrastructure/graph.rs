//! Microsoft Graph `sendMail` transport

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use clap::Parser;
use reqwest::{header::RETRY_AFTER, Client, Response, Url};
use serde::Serialize;

use crate::domain::{
    auth::AccessToken,
    messages::MessagePayload,
    recipients::EmailAddress,
    sending::{MailTransport, TransportError, TransportResponse},
};

const FILE_ATTACHMENT_TYPE: &str = "#microsoft.graph.fileAttachment";

/// Microsoft Graph settings
#[derive(Clone, Debug, Parser)]
pub struct GraphConfig {
    /// Mailbox the messages are sent from
    #[clap(long, env = "SENDER_EMAIL")]
    pub sender: EmailAddress,

    /// Base URL of the Graph API, version included
    #[clap(long, env = "GRAPH_URL", default_value = "https://graph.microsoft.com/v1.0")]
    pub graph_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: Message<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Message<'a> {
    subject: &'a str,
    body: Body<'a>,
    to_recipients: [Recipient<'a>; 1],

    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<FileAttachment<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Body<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient<'a> {
    email_address: Address<'a>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileAttachment<'a> {
    #[serde(rename = "@odata.type")]
    odata_type: &'static str,
    name: &'a str,
    content_type: &'a str,
    content_bytes: String,
}

impl<'a> From<&'a MessagePayload> for SendMailRequest<'a> {
    fn from(payload: &'a MessagePayload) -> Self {
        let body = if payload.html_body.is_empty() {
            Body {
                content_type: "Text",
                content: &payload.text_body,
            }
        } else {
            Body {
                content_type: "HTML",
                content: &payload.html_body,
            }
        };

        let attachments = payload
            .attachment
            .iter()
            .map(|attachment| FileAttachment {
                odata_type: FILE_ATTACHMENT_TYPE,
                name: attachment.name(),
                content_type: attachment.content_type(),
                content_bytes: attachment.content_bytes(),
            })
            .collect();

        Self {
            message: Message {
                subject: &payload.subject,
                body,
                to_recipients: [Recipient {
                    email_address: Address {
                        address: payload.to.as_str(),
                    },
                }],
                attachments,
            },
        }
    }
}

/// Sends messages as the configured mailbox through `POST /users/{sender}/sendMail`
#[derive(Clone, Debug)]
pub struct GraphMailer {
    client: Client,
    send_mail_url: Url,
}

impl GraphMailer {
    /// Create a new mailer sending as `config.sender`
    ///
    /// The sender is percent-encoded as a single path segment.
    pub fn new(client: Client, config: &GraphConfig) -> anyhow::Result<Self> {
        let mut send_mail_url = Url::parse(&config.graph_url)?;

        send_mail_url
            .path_segments_mut()
            .map_err(|_| anyhow!("{} cannot be used as a base URL", config.graph_url))?
            .pop_if_empty()
            .extend(["users", config.sender.as_str(), "sendMail"]);

        Ok(Self {
            client,
            send_mail_url,
        })
    }
}

/// Integer seconds only; HTTP-date hints are ignored
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl MailTransport for GraphMailer {
    async fn send(
        &self,
        token: &AccessToken,
        payload: &MessagePayload,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(self.send_mail_url.clone())
            .bearer_auth(token.value())
            .json(&SendMailRequest::from(payload))
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let mut result = TransportResponse::new(response.status().as_u16());

        if let Some(delay) = retry_after(&response) {
            result = result.with_retry_after(delay);
        }

        let body = response.text().await.unwrap_or_default();

        Ok(result.with_body(body))
    }
}
