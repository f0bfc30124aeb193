use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text-layer extraction backends.
///
/// Implementors provide the low-level text extraction step; candidate
/// selection and cleanup live in `resume_ingest::TextExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Extract the full text content of a PDF file.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Trait for optical recognition backends used on image-only PDFs.
pub trait OcrBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Whether the backend's runtime requirements (binaries, models) are present.
    fn is_available(&self) -> bool;

    /// Human-readable explanation of what is missing, for logs.
    fn availability_hint(&self) -> String;

    /// Rasterize every page of the PDF and return the recognized text per page.
    fn ocr_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}
