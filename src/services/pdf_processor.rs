use std::time::Instant;

use async_trait::async_trait;
use lopdf::Document;

use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct ExtractionResult {
    pub text: String,
    pub pages: usize,
    pub processing_time_ms: u64,
}

/// Converts PDF bytes into plain text, pages concatenated in document order.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, content: &[u8]) -> AppResult<ExtractionResult>;

    fn is_available(&self) -> bool {
        true
    }
}

pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn page_count(&self, pdf_content: &[u8]) -> Option<usize> {
        Document::load_mem(pdf_content)
            .ok()
            .map(|doc| doc.get_pages().len())
    }
}

#[async_trait]
impl TextExtractor for PdfProcessor {
    async fn extract_text(&self, content: &[u8]) -> AppResult<ExtractionResult> {
        let start = Instant::now();

        tracing::info!("Starting PDF text extraction ({} bytes)", content.len());

        if !content.starts_with(b"%PDF") {
            tracing::warn!("Upload does not start with a PDF header, trying extraction anyway");
        }

        let pages = self.page_count(content).unwrap_or_else(|| {
            tracing::warn!("PDF structure validation failed, will try text extraction anyway");
            0
        });

        let bytes = content.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::internal(format!("PDF extraction task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!("PDF text extraction failed: {}", e);
                AppError::processing(format!("Failed to extract text from PDF: {}", e))
            })?;

        if text.trim().is_empty() {
            tracing::warn!("No text extracted from PDF; the document may be scanned");
        }

        let processing_time = start.elapsed().as_millis() as u64;

        tracing::info!(
            "PDF processing completed in {}ms, extracted {} characters from {} pages",
            processing_time,
            text.len(),
            pages
        );

        Ok(ExtractionResult {
            text,
            pages,
            processing_time_ms: processing_time,
        })
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}
