//! PDF text extraction backed by `pdf-extract`.

use super::{split_pages, Page, TextExtractor};
use helper_core::{AppError, AppResult};
use std::io::Write;
use tempfile::NamedTempFile;

/// Extracts PDF text on the blocking pool.
///
/// The upload is staged in a named temporary file which is removed when the
/// guard drops, whichever way extraction ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn stage(bytes: &[u8]) -> AppResult<NamedTempFile> {
        let mut staged = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile()?;
        staged.write_all(bytes)?;
        staged.flush()?;
        Ok(staged)
    }

    fn extract_staged(staged: NamedTempFile) -> AppResult<String> {
        tracing::debug!("Extracting text from {:?}", staged.path());

        pdf_extract::extract_text(staged.path())
            .map_err(|e| AppError::Ingest(format!("Failed to extract PDF text: {}", e)))
    }
}

#[async_trait::async_trait]
impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf-extract"
    }

    async fn extract(&self, bytes: Vec<u8>) -> AppResult<Vec<Page>> {
        let size = bytes.len();
        let staged = Self::stage(&bytes)?;
        drop(bytes);

        let text = tokio::task::spawn_blocking(move || Self::extract_staged(staged))
            .await
            .map_err(|e| AppError::Ingest(format!("PDF extraction aborted: {}", e)))??;

        let pages = split_pages(&text);

        tracing::info!(
            "Extracted {} chars across {} pages from {} byte PDF",
            text.chars().count(),
            pages.len(),
            size
        );

        Ok(pages)
    }
}
