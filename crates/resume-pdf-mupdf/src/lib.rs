use std::path::Path;

use mupdf::{Document, TextPageFlags};

use resume_core::{BackendError, PdfBackend};

/// Layout-aware text backend built on MuPDF structured text.
///
/// This crate is the only one that links `mupdf` (AGPL-3.0), so the rest of
/// the workspace does not depend on it transitively.
///
/// Text is read block by block; each block becomes a paragraph separated by
/// a blank line, which keeps resume sections apart. Header and footer bands
/// can be excluded, but are kept by default because resumes often put
/// contact details in the page header.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from the bottom to drop as footer.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from the top to drop as header.
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    pub fn footer_exclusion(&self) -> Option<f32> {
        self.footer_exclusion_ratio
    }

    pub fn header_exclusion(&self) -> Option<f32> {
        self.header_exclusion_ratio
    }
}

fn extraction_error(e: mupdf::Error) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &str {
        "mupdf"
    }

    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document.pages().map_err(extraction_error)? {
            let page = page_result.map_err(extraction_error)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(extraction_error)?;

            let page_bounds = page.bounds().map_err(extraction_error)?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            let mut blocks = Vec::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                if header_threshold.is_some_and(|t| block_bounds.y1 <= t) {
                    continue;
                }
                if footer_threshold.is_some_and(|t| block_bounds.y0 >= t) {
                    continue;
                }

                let lines: Vec<String> = block
                    .lines()
                    .map(|line| {
                        line.chars()
                            .map(|c| c.char().unwrap_or('\u{FFFD}'))
                            .collect::<String>()
                    })
                    .filter(|l| !l.trim().is_empty())
                    .collect();
                if !lines.is_empty() {
                    blocks.push(lines.join("\n"));
                }
            }
            pages_text.push(blocks.join("\n\n"));
        }

        tracing::debug!(pages = pages_text.len(), "mupdf extracted pages");
        Ok(pages_text.join("\n\n"))
    }
}
