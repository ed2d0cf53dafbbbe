//! PDF attachment

use std::{fmt, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::AttachmentError;

/// MIME type of every attachment
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A PDF document attached to every message of a run
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    name: String,
    content: Vec<u8>,
}

impl Attachment {
    /// Create an attachment, checking the file name has a `.pdf` extension
    pub fn pdf(name: impl Into<String>, content: Vec<u8>) -> Result<Self, AttachmentError> {
        let name = name.into();

        let is_pdf = Path::new(&name)
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"));

        if !is_pdf {
            return Err(AttachmentError::NotPdf(name));
        }

        Ok(Self { name, content })
    }

    /// Read the attachment from disk
    pub async fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AttachmentError::MissingFileName(path.to_path_buf()))?;

        let content =
            tokio::fs::read(path)
                .await
                .map_err(|source| AttachmentError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

        Self::pdf(name, content)
    }

    /// File name shown to the recipient
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type of the attachment
    pub fn content_type(&self) -> &str {
        PDF_CONTENT_TYPE
    }

    /// Raw file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// File content encoded as standard base64
    pub fn content_bytes(&self) -> String {
        STANDARD.encode(&self.content)
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n\xff\x00";

    #[test]
    fn test_content_bytes_decode_to_original() -> TestResult {
        let attachment = Attachment::pdf("invoice.pdf", PDF.to_vec())?;

        let decoded = STANDARD.decode(attachment.content_bytes())?;

        assert_eq!(decoded, PDF);
        assert_eq!(attachment.content_type(), "application/pdf");

        Ok(())
    }

    #[test]
    fn test_uppercase_extension_accepted() -> TestResult {
        let attachment = Attachment::pdf("REPORT.PDF", PDF.to_vec())?;

        assert_eq!(attachment.name(), "REPORT.PDF");

        Ok(())
    }

    #[test]
    fn test_non_pdf_rejected() {
        let result = Attachment::pdf("notes.docx", b"PK".to_vec());

        assert!(matches!(result, Err(AttachmentError::NotPdf(name)) if name == "notes.docx"));
    }

    #[tokio::test]
    async fn test_from_path_reads_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("brochure.pdf");
        std::fs::write(&path, PDF)?;

        let attachment = Attachment::from_path(&path).await?;

        assert_eq!(attachment.name(), "brochure.pdf");
        assert_eq!(attachment.content(), PDF);

        Ok(())
    }

    #[tokio::test]
    async fn test_from_path_missing_file_fails() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = Attachment::from_path(&dir.path().join("missing.pdf")).await;

        assert!(matches!(result, Err(AttachmentError::Unreadable { .. })));

        Ok(())
    }
}
