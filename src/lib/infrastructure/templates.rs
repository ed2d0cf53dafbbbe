//! Message template and attachment loading

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::domain::messages::{Attachment, AttachmentError, Logo, MessageTemplate};

/// Message content settings.
///
/// A body read from a file wins over the same body given inline; the built-in
/// template fills in whatever is left unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Parser)]
pub struct MessageConfig {
    /// Message subject
    #[clap(long, env = "EMAIL_SUBJECT")]
    pub subject: Option<String>,

    /// HTML body
    #[clap(long, env = "EMAIL_BODY_HTML")]
    pub html_body: Option<String>,

    /// File holding the HTML body
    #[clap(long, env = "EMAIL_BODY_HTML_FILE")]
    pub html_body_file: Option<PathBuf>,

    /// Plain text body
    #[clap(long, env = "EMAIL_BODY_TEXT")]
    pub text_body: Option<String>,

    /// File holding the plain text body
    #[clap(long, env = "EMAIL_BODY_TEXT_FILE")]
    pub text_body_file: Option<PathBuf>,

    /// PDF attached to every message
    #[clap(long, env = "ATTACHMENT_PATH")]
    pub attachment_path: Option<PathBuf>,

    /// Logo image embedded in the HTML body
    #[clap(long, env = "LOGO_PATH")]
    pub logo_path: Option<PathBuf>,

    /// Logo image URL, used when no logo file is found
    #[clap(long, env = "LOGO_URL")]
    pub logo_url: Option<String>,
}

impl MessageConfig {
    /// Builds the template shared by every message of the run.
    ///
    /// Logo files are looked up in `dir` when no logo path is configured.
    pub async fn template(&self, dir: &Path) -> Result<MessageTemplate> {
        let subject = self
            .subject
            .clone()
            .unwrap_or_else(|| MessageTemplate::default_subject().to_string());

        let html_body = body(
            self.html_body_file.as_deref(),
            self.html_body.as_deref(),
            MessageTemplate::default_html_body(),
        )
        .await?;

        let text_body = body(
            self.text_body_file.as_deref(),
            self.text_body.as_deref(),
            MessageTemplate::default_text_body(),
        )
        .await?;

        Ok(MessageTemplate {
            subject,
            html_body: inline_css(html_body),
            text_body,
            logo: self.logo(dir).await,
        })
    }

    /// Loads the configured attachment, if any
    pub async fn attachment(&self) -> Result<Option<Arc<Attachment>>, AttachmentError> {
        let Some(path) = self.attachment_path.as_deref() else {
            return Ok(None);
        };

        let attachment = Attachment::from_path(path).await?;

        info!(
            name = attachment.name(),
            bytes = attachment.content().len(),
            "attachment loaded"
        );

        Ok(Some(Arc::new(attachment)))
    }

    async fn logo(&self, dir: &Path) -> Option<Logo> {
        let path = match &self.logo_path {
            Some(path) => Some(path.clone()),
            None => Logo::discover(dir),
        };

        if let Some(path) = path {
            match Logo::from_path(&path).await {
                Ok(logo) => {
                    info!(path = %path.display(), "logo embedded");
                    return Some(logo);
                }
                Err(err) => warn!("{err}, falling back to the logo URL"),
            }
        }

        self.logo_url.clone().map(Logo::Remote)
    }
}

async fn body(file: Option<&Path>, inline: Option<&str>, default: &str) -> Result<String> {
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read message body {}", path.display()));
    }

    Ok(inline.unwrap_or(default).to_string())
}

/// Moves `<style>` rules into `style` attributes, which mail clients honor more reliably
fn inline_css(html: String) -> String {
    match css_inline::inline(&html) {
        Ok(inlined) => inlined,
        Err(err) => {
            warn!("could not inline CSS, sending the HTML body as is: {err}");
            html
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_defaults_fill_unset_fields() -> TestResult {
        let dir = TempDir::new()?;

        let template = MessageConfig::default().template(dir.path()).await?;

        assert_eq!(template.subject, MessageTemplate::default_subject());
        assert_eq!(template.text_body, MessageTemplate::default_text_body());
        assert!(template.logo.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_body_file_wins_over_inline_body() -> TestResult {
        let dir = TempDir::new()?;
        let text_file = dir.path().join("body.txt");
        std::fs::write(&text_file, "from file")?;

        let config = MessageConfig {
            text_body: Some("inline".to_string()),
            text_body_file: Some(text_file),
            ..Default::default()
        };

        let template = config.template(dir.path()).await?;

        assert_eq!(template.text_body, "from file");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_body_file_fails() -> TestResult {
        let dir = TempDir::new()?;

        let config = MessageConfig {
            html_body_file: Some(dir.path().join("missing.html")),
            ..Default::default()
        };

        assert!(config.template(dir.path()).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_style_rules_are_inlined() -> TestResult {
        let dir = TempDir::new()?;

        let config = MessageConfig {
            html_body: Some(
                "<html><head><style>p { color: red }</style></head><body><p>Hi</p></body></html>"
                    .to_string(),
            ),
            ..Default::default()
        };

        let template = config.template(dir.path()).await?;

        assert!(!template.html_body.contains("<style>"));
        assert!(template.html_body.contains("color: red"));

        Ok(())
    }

    #[tokio::test]
    async fn test_logo_discovered_in_directory() -> TestResult {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G'])?;

        let config = MessageConfig {
            logo_url: Some("https://example.com/logo.png".to_string()),
            ..Default::default()
        };

        let template = config.template(dir.path()).await?;

        assert_eq!(template.logo, Some(Logo::embedded("image/png", &[0x89, b'P', b'N', b'G'])));

        Ok(())
    }

    #[tokio::test]
    async fn test_logo_url_used_without_logo_file() -> TestResult {
        let dir = TempDir::new()?;

        let config = MessageConfig {
            logo_path: Some(dir.path().join("missing.png")),
            logo_url: Some("https://example.com/logo.png".to_string()),
            ..Default::default()
        };

        let template = config.template(dir.path()).await?;

        assert_eq!(
            template.logo,
            Some(Logo::Remote("https://example.com/logo.png".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_attachment_loaded_when_configured() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("brochure.pdf");
        std::fs::write(&path, b"%PDF-1.4")?;

        let config = MessageConfig {
            attachment_path: Some(path),
            ..Default::default()
        };

        let attachment = config.attachment().await?;

        assert_eq!(attachment.map(|a| a.name().to_string()), Some("brochure.pdf".to_string()));
        assert!(MessageConfig::default().attachment().await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_non_pdf_attachment_rejected() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "notes")?;

        let config = MessageConfig {
            attachment_path: Some(path),
            ..Default::default()
        };

        assert!(matches!(
            config.attachment().await,
            Err(AttachmentError::NotPdf(_))
        ));

        Ok(())
    }
}
