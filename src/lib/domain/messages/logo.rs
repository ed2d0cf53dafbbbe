//! Logo embedded in the HTML body

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::LogoError;

/// File names looked up in the working directory when no logo is configured
pub const LOGO_CANDIDATES: [&str; 5] = [
    "logo_black.png",
    "logo.png",
    "logo.jpg",
    "logo.jpeg",
    "logo.gif",
];

/// Where the logo image comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Logo {
    /// Image embedded as a base64 data URI
    Embedded {
        /// MIME type of the image
        content_type: String,

        /// Base64 image data
        data: String,
    },

    /// Image referenced by an external URL
    Remote(String),
}

impl Logo {
    /// Embed raw image bytes
    pub fn embedded(content_type: impl Into<String>, content: &[u8]) -> Self {
        Logo::Embedded {
            content_type: content_type.into(),
            data: STANDARD.encode(content),
        }
    }

    /// Read and embed an image file; the MIME type follows the extension
    pub async fn from_path(path: &Path) -> Result<Self, LogoError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| LogoError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::embedded(content_type_for(path), &content))
    }

    /// Returns the first of [`LOGO_CANDIDATES`] present in `dir`
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        LOGO_CANDIDATES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Value for the `src` attribute of the `<img>` tag
    pub fn src(&self) -> String {
        match self {
            Logo::Embedded { content_type, data } => format!("data:{content_type};base64,{data}"),
            Logo::Remote(url) => url.clone(),
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
