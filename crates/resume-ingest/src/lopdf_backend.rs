use std::path::Path;

use lopdf::Document;

use resume_core::{BackendError, PdfBackend};

/// Page-stream text backend built on `lopdf`.
///
/// Reads each page's content stream in page order. Pages that fail to
/// decode are skipped; the rest are joined with blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let doc = Document::load(path).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();
        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        pages.push(text.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!(page = page_num, error = %e, "lopdf: page text unavailable");
                }
            }
        }

        Ok(pages.join("\n\n"))
    }
}
