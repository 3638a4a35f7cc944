//! Upload validation and text extraction.
//!
//! An upload is accepted only when it looks like a PDF. Extraction goes
//! through the [`TextExtractor`] trait so the service can be driven by a
//! stub in tests; [`PdfExtractor`] is the real implementation.

mod pdf;

pub use pdf::PdfExtractor;

use helper_core::{AppError, AppResult};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Declared types that do not contradict a `.pdf` filename.
const ACCEPTED_CONTENT_TYPES: [&str; 3] =
    [PDF_CONTENT_TYPE, "application/x-pdf", "application/octet-stream"];

/// A document received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied filename
    pub filename: String,

    /// Declared MIME type, if the client sent one
    pub content_type: Option<String>,

    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Whether the upload is a PDF: the filename must end in `.pdf`, and a
    /// declared type, when present, must not contradict it.
    pub fn is_pdf(&self) -> bool {
        let by_name = self.filename.to_ascii_lowercase().ends_with(".pdf");
        let type_agrees = self
            .content_type
            .as_deref()
            .map(|ct| {
                let ct = ct.trim();
                ACCEPTED_CONTENT_TYPES
                    .iter()
                    .any(|accepted| ct.eq_ignore_ascii_case(accepted))
            })
            .unwrap_or(true);
        by_name && type_agrees
    }

    /// Reject anything that is not a non-empty PDF.
    pub fn validate(&self) -> AppResult<()> {
        if !self.is_pdf() {
            return Err(AppError::InvalidInput(
                "Only PDF files are supported".to_string(),
            ));
        }

        if self.bytes.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Uploaded file '{}' is empty",
                self.filename
            )));
        }

        Ok(())
    }
}

/// Text of one page, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

impl Page {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Pulls per-page text out of a document.
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync + std::fmt::Debug {
    /// Extractor name for logs
    fn name(&self) -> &str;

    /// Extract the text of every page. Pages without text may be omitted.
    async fn extract(&self, bytes: Vec<u8>) -> AppResult<Vec<Page>>;
}

/// Split extracted text into pages on form feeds, dropping blank pages.
pub fn split_pages(text: &str) -> Vec<Page> {
    text.split('\x0C')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| Page::new(i as u32 + 1, page))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_by_extension_any_case() {
        assert!(Upload::new("rules.pdf", vec![1]).is_pdf());
        assert!(Upload::new("Catan-Rules.PDF", vec![1]).is_pdf());
        assert!(!Upload::new("rules.txt", vec![1]).is_pdf());
        assert!(!Upload::new("pdf", vec![1]).is_pdf());
    }

    #[test]
    fn test_content_type_never_substitutes_for_name() {
        for name in ["download", "notes.txt"] {
            let err = Upload::new(name, vec![1])
                .with_content_type("application/pdf")
                .validate()
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_contradicting_content_type_rejected() {
        assert!(!Upload::new("rules.pdf", vec![1])
            .with_content_type("text/plain")
            .is_pdf());
        assert!(Upload::new("rules.pdf", vec![1])
            .with_content_type("application/octet-stream")
            .is_pdf());
        assert!(Upload::new("rules.pdf", vec![1])
            .with_content_type("Application/PDF")
            .is_pdf());
    }

    #[test]
    fn test_validate_rejects_non_pdf() {
        let err = Upload::new("notes.txt", b"hello".to_vec())
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Only PDF files are supported");
    }

    #[test]
    fn test_validate_rejects_empty_payload() {
        let err = Upload::new("rules.pdf", Vec::new()).validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_split_pages_numbers_from_one() {
        let pages = split_pages("Setup\x0CTurn order\x0C\x0C  \x0CScoring");
        assert_eq!(
            pages,
            vec![
                Page::new(1, "Setup"),
                Page::new(2, "Turn order"),
                Page::new(5, "Scoring"),
            ]
        );
    }

    #[test]
    fn test_split_pages_without_form_feed() {
        let pages = split_pages("single page of rules");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(split_pages(" \n ").is_empty());
    }
}
