//! Message composition errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the attachment
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The attachment file could not be read
    #[error("could not read attachment {}", path.display())]
    Unreadable {
        /// Path of the attachment
        path: PathBuf,

        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The attachment is not a PDF document
    #[error("attachment {0} is not a PDF file")]
    NotPdf(String),

    /// The attachment path has no file name
    #[error("attachment path {} has no file name", .0.display())]
    MissingFileName(PathBuf),
}

/// Errors raised while loading a logo file
#[derive(Debug, Error)]
pub enum LogoError {
    /// The logo file could not be read
    #[error("could not read logo {}", path.display())]
    Unreadable {
        /// Path of the logo
        path: PathBuf,

        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
