//! Message template shared by every recipient of a run

use super::Logo;

/// Token in the bodies replaced by the logo `<img>` tag, or removed when there is no logo
pub const LOGO_PLACEHOLDER: &str = "{{logo}}";

const DEFAULT_SUBJECT: &str = "Your Email Subject Here";

const DEFAULT_HTML_BODY: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
        .container { max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { text-align: center; padding: 20px; }
        .content { padding: 20px; background-color: #f9f9f9; }
        .footer { background-color: #333; color: white; padding: 20px; text-align: center; font-size: 12px; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            {{logo}}
            <h1>Your Company Name</h1>
        </div>
        <div class="content">
            <p>Dear Recipient,</p>
            <p>This is a sample email template. Set EMAIL_BODY_HTML or EMAIL_BODY_HTML_FILE to replace it.</p>
            <p>Best regards,<br>Your Team</p>
        </div>
        <div class="footer">
            <p>&copy; Your Company. All rights reserved.</p>
        </div>
    </div>
</body>
</html>
"#;

const DEFAULT_TEXT_BODY: &str = "Dear Recipient,

This is a sample email template. Set EMAIL_BODY_TEXT or EMAIL_BODY_TEXT_FILE to replace it.

Best regards,
Your Team
";

/// Subject, bodies and logo shared by every message of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageTemplate {
    /// Message subject
    pub subject: String,

    /// HTML body, possibly containing [`LOGO_PLACEHOLDER`]
    pub html_body: String,

    /// Plain text body
    pub text_body: String,

    /// Logo substituted for [`LOGO_PLACEHOLDER`]
    pub logo: Option<Logo>,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            html_body: DEFAULT_HTML_BODY.to_string(),
            text_body: DEFAULT_TEXT_BODY.to_string(),
            logo: None,
        }
    }
}

impl MessageTemplate {
    /// The built-in subject
    pub fn default_subject() -> &'static str {
        DEFAULT_SUBJECT
    }

    /// The built-in HTML body
    pub fn default_html_body() -> &'static str {
        DEFAULT_HTML_BODY
    }

    /// The built-in plain text body
    pub fn default_text_body() -> &'static str {
        DEFAULT_TEXT_BODY
    }
}
