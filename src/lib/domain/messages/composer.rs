//! Message composition

use std::sync::Arc;

use crate::domain::recipients::EmailAddress;

use super::{Attachment, MessagePayload, MessageTemplate, LOGO_PLACEHOLDER};

const LOGO_STYLE: &str = "max-width: 250px; height: auto; display: block; margin: 0 auto; border: 0;";

/// Builds the payload for `recipient` from the run's template and attachment.
///
/// The logo placeholder becomes an `<img>` tag when the template has a logo and
/// is removed otherwise. The result only depends on the arguments.
pub fn compose(
    template: &MessageTemplate,
    recipient: &EmailAddress,
    attachment: Option<&Arc<Attachment>>,
) -> MessagePayload {
    let logo_tag = template
        .logo
        .as_ref()
        .map(|logo| {
            format!(
                r#"<img src="{src}" alt="Logo" style="{LOGO_STYLE}" />"#,
                src = logo.src()
            )
        })
        .unwrap_or_default();

    MessagePayload {
        to: recipient.clone(),
        subject: template.subject.clone(),
        html_body: template.html_body.replace(LOGO_PLACEHOLDER, &logo_tag),
        text_body: template.text_body.replace(LOGO_PLACEHOLDER, ""),
        attachment: attachment.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use testresult::TestResult;

    use crate::domain::messages::Logo;

    use super::*;

    fn template(logo: Option<Logo>) -> MessageTemplate {
        MessageTemplate {
            subject: "Quarterly report".to_string(),
            html_body: "<div>{{logo}}</div><p>Hello</p>".to_string(),
            text_body: "Hello{{logo}}".to_string(),
            logo,
        }
    }

    #[test]
    fn test_recipient_and_subject_copied() -> TestResult {
        let recipient = EmailAddress::new("a@x.com")?;

        let payload = compose(&template(None), &recipient, None);

        assert_eq!(payload.to, recipient);
        assert_eq!(payload.subject, "Quarterly report");
        assert!(payload.attachment.is_none());

        Ok(())
    }

    #[test]
    fn test_placeholder_removed_without_logo() -> TestResult {
        let payload = compose(&template(None), &EmailAddress::new("a@x.com")?, None);

        assert_eq!(payload.html_body, "<div></div><p>Hello</p>");
        assert_eq!(payload.text_body, "Hello");

        Ok(())
    }

    #[test]
    fn test_embedded_logo_becomes_data_uri() -> TestResult {
        let logo = Logo::embedded("image/gif", b"GIF89a");

        let payload = compose(&template(Some(logo)), &EmailAddress::new("a@x.com")?, None);

        assert!(payload
            .html_body
            .contains(r#"<img src="data:image/gif;base64,R0lGODlh" alt="Logo""#));
        assert!(!payload.html_body.contains(LOGO_PLACEHOLDER));

        Ok(())
    }

    #[test]
    fn test_remote_logo_uses_url() -> TestResult {
        let logo = Logo::Remote("https://cdn.example.com/logo.png".to_string());

        let payload = compose(&template(Some(logo)), &EmailAddress::new("a@x.com")?, None);

        assert!(payload
            .html_body
            .contains(r#"src="https://cdn.example.com/logo.png""#));

        Ok(())
    }

    #[test]
    fn test_attachment_round_trips() -> TestResult {
        let content = b"%PDF-1.7\nbinary\x00\x01\x02".to_vec();
        let attachment = Arc::new(Attachment::pdf("offer.pdf", content.clone())?);

        let payload = compose(
            &template(None),
            &EmailAddress::new("a@x.com")?,
            Some(&attachment),
        );

        let encoded = payload.attachment.map(|a| a.content_bytes()).unwrap_or_default();
        assert_eq!(STANDARD.decode(encoded)?, content);

        Ok(())
    }

    #[test]
    fn test_compose_is_deterministic() -> TestResult {
        let recipient = EmailAddress::new("a@x.com")?;
        let template = template(Some(Logo::embedded("image/png", b"\x89PNG")));

        assert_eq!(
            compose(&template, &recipient, None),
            compose(&template, &recipient, None)
        );

        Ok(())
    }
}
