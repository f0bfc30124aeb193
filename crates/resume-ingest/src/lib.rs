use std::path::PathBuf;

use thiserror::Error;

pub mod clean;
pub mod extractor;
pub mod lopdf_backend;
pub mod ocr;
pub mod pipeline;

pub use clean::clean_text;
pub use extractor::TextExtractor;
pub use lopdf_backend::LopdfBackend;
pub use ocr::TesseractOcr;
pub use pipeline::{PipelineOutput, ResumePipeline};

// Re-export domain types for convenience
pub use resume_core::{
    Capabilities, ExtractedText, ExtractionMethod, ParsedResume, PipelineConfig,
};

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("document unreadable: {path:?}: {reason}")]
    DocumentUnreadable { path: PathBuf, reason: String },
    #[error("input is not a PDF (missing %PDF- header)")]
    NotPdf,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
