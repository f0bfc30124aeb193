use std::path::Path;
use std::sync::Arc;

use resume_core::{
    BackendError, ExtractedText, ExtractionCandidate, ExtractionMethod, OcrBackend, PdfBackend,
    PipelineConfig,
};

use crate::ExtractionError;
use crate::clean::clean_text;

/// Races the text-layer backends, falls back to OCR on image-only PDFs and
/// cleans the winning candidate.
pub struct TextExtractor {
    backends: Vec<(ExtractionMethod, Box<dyn PdfBackend>)>,
    ocr: Option<Arc<dyn OcrBackend>>,
    min_content_chars: usize,
    ocr_enabled: bool,
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field(
                "backends",
                &self.backends.iter().map(|(_, b)| b.name()).collect::<Vec<_>>(),
            )
            .field("ocr", &self.ocr.as_ref().map(|o| o.name()))
            .field("min_content_chars", &self.min_content_chars)
            .field("ocr_enabled", &self.ocr_enabled)
            .finish()
    }
}

impl TextExtractor {
    /// An extractor with the given primary text backend and nothing else.
    pub fn new(primary: Box<dyn PdfBackend>) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            backends: vec![(ExtractionMethod::PrimaryText, primary)],
            ocr: None,
            min_content_chars: defaults.min_content_chars,
            ocr_enabled: defaults.ocr_enabled,
        }
    }

    /// `lopdf` as primary, MuPDF as secondary when the `pdf` feature is on.
    pub fn with_default_backends() -> Self {
        let extractor = Self::new(Box::new(crate::LopdfBackend::new()));
        #[cfg(feature = "pdf")]
        let extractor = extractor.with_secondary(Box::new(resume_pdf_mupdf::MupdfBackend::new()));
        extractor
    }

    pub fn with_secondary(mut self, secondary: Box<dyn PdfBackend>) -> Self {
        self.backends
            .retain(|(method, _)| *method != ExtractionMethod::SecondaryText);
        self.backends.push((ExtractionMethod::SecondaryText, secondary));
        self
    }

    /// Register an OCR backend. Availability is checked here, once; an
    /// unavailable backend is logged and dropped.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrBackend>) -> Self {
        if ocr.is_available() {
            tracing::debug!(backend = ocr.name(), "OCR backend available");
            self.ocr = Some(ocr);
        } else {
            tracing::warn!(
                backend = ocr.name(),
                hint = %ocr.availability_hint(),
                "OCR backend unavailable, image-only PDFs will yield little text"
            );
            self.ocr = None;
        }
        self
    }

    pub fn with_min_content_chars(mut self, chars: usize) -> Self {
        self.min_content_chars = chars;
        self
    }

    pub fn with_ocr_enabled(mut self, enabled: bool) -> Self {
        self.ocr_enabled = enabled;
        self
    }

    /// Apply the extraction knobs from a pipeline config.
    pub fn configured(self, config: &PipelineConfig) -> Self {
        self.with_min_content_chars(config.min_content_chars)
            .with_ocr_enabled(config.ocr_enabled)
    }

    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Extract and clean the text of a PDF.
    ///
    /// Backend failures yield empty candidates. Fails only when the file
    /// cannot be read at all, or when every backend fails to open it and
    /// OCR produces nothing.
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        std::fs::File::open(path).map_err(|e| ExtractionError::DocumentUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut candidates = Vec::with_capacity(self.backends.len() + 1);
        let mut open_failures = Vec::new();
        for (method, backend) in &self.backends {
            let text = match backend.extract_text(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(backend = backend.name(), error = %e, "text backend failed");
                    if matches!(e, BackendError::OpenError(_)) {
                        open_failures.push(format!("{}: {}", backend.name(), e));
                    }
                    String::new()
                }
            };
            let candidate = ExtractionCandidate::new(*method, text);
            tracing::debug!(backend = backend.name(), chars = candidate.length, "text candidate");
            candidates.push(candidate);
        }

        let starved = candidates
            .iter()
            .all(|c| c.length < self.min_content_chars);
        if starved {
            if let Some(candidate) = self.run_ocr(path) {
                candidates.push(candidate);
            }
        }

        let all_unopened = open_failures.len() == self.backends.len();
        let has_text = candidates.iter().any(|c| c.length > 0);
        if all_unopened && !has_text {
            return Err(ExtractionError::DocumentUnreadable {
                path: path.to_path_buf(),
                reason: open_failures.join("; "),
            });
        }

        Ok(self.finish(candidates))
    }

    fn run_ocr(&self, path: &Path) -> Option<ExtractionCandidate> {
        if !self.ocr_enabled {
            tracing::debug!("text layers below threshold, OCR disabled");
            return None;
        }
        let ocr = self.ocr.as_ref()?;
        tracing::info!(
            backend = ocr.name(),
            threshold = self.min_content_chars,
            "text layers below threshold, running OCR"
        );
        match ocr.ocr_pages(path) {
            Ok(pages) => {
                let text = pages
                    .iter()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                Some(ExtractionCandidate::new(
                    ExtractionMethod::OpticalRecognition,
                    text,
                ))
            }
            Err(e) => {
                tracing::warn!(backend = ocr.name(), error = %e, "OCR failed");
                None
            }
        }
    }

    /// Pick the winner among already-collected candidates and clean it.
    ///
    /// Longest wins; on equal length the earlier candidate is kept.
    pub fn finish(&self, candidates: Vec<ExtractionCandidate>) -> ExtractedText {
        let summaries = candidates.iter().map(ExtractionCandidate::summary).collect();
        let winner = candidates.into_iter().reduce(|best, c| {
            if c.length > best.length { c } else { best }
        });

        let (method, raw, length) = match winner {
            Some(c) => (c.method, c.text, c.length),
            None => (ExtractionMethod::PrimaryText, String::new(), 0),
        };

        let low_content = length < self.min_content_chars;
        if low_content {
            tracing::warn!(
                chars = length,
                threshold = self.min_content_chars,
                method = %method,
                "extracted text is below the content threshold"
            );
        }

        ExtractedText {
            text: clean_text(&raw),
            method,
            candidates: summaries,
            low_content,
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::with_default_backends()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend(&'static str, Result<&'static str, &'static str>);

    impl PdfBackend for FixedBackend {
        fn name(&self) -> &str {
            self.0
        }

        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            self.1
                .map(str::to_string)
                .map_err(|e| BackendError::OpenError(e.to_string()))
        }
    }

    fn candidate(method: ExtractionMethod, text: &str) -> ExtractionCandidate {
        ExtractionCandidate::new(method, text.to_string())
    }

    #[test]
    fn test_finish_longest_wins() {
        let extractor = TextExtractor::new(Box::new(FixedBackend("a", Ok(""))));
        let out = extractor.finish(vec![
            candidate(ExtractionMethod::PrimaryText, "short"),
            candidate(ExtractionMethod::SecondaryText, "a little longer"),
        ]);
        assert_eq!(out.method, ExtractionMethod::SecondaryText);
        assert_eq!(out.text, "a little longer");
        assert_eq!(out.candidates.len(), 2);
    }

    #[test]
    fn test_finish_tie_keeps_first() {
        let extractor = TextExtractor::new(Box::new(FixedBackend("a", Ok(""))));
        let out = extractor.finish(vec![
            candidate(ExtractionMethod::PrimaryText, "abcd"),
            candidate(ExtractionMethod::SecondaryText, "wxyz"),
        ]);
        assert_eq!(out.method, ExtractionMethod::PrimaryText);
        assert_eq!(out.text, "abcd");
    }

    #[test]
    fn test_finish_no_candidates() {
        let extractor = TextExtractor::new(Box::new(FixedBackend("a", Ok(""))));
        let out = extractor.finish(vec![]);
        assert!(out.text.is_empty());
        assert!(out.low_content);
    }

    #[test]
    fn test_secondary_replaced_not_duplicated() {
        let extractor = TextExtractor::new(Box::new(FixedBackend("a", Ok(""))))
            .with_secondary(Box::new(FixedBackend("b", Ok(""))))
            .with_secondary(Box::new(FixedBackend("c", Ok(""))));
        assert_eq!(extractor.backends.len(), 2);
        assert_eq!(extractor.backends[1].1.name(), "c");
    }

    #[test]
    fn test_missing_path_unreadable() {
        let extractor = TextExtractor::new(Box::new(FixedBackend("a", Ok("text"))));
        let err = extractor
            .extract(Path::new("/nonexistent/resume.pdf"))
            .unwrap_err();
        assert!(
            matches!(err, ExtractionError::DocumentUnreadable { .. }),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_configured_applies_knobs() {
        let config = PipelineConfig {
            min_content_chars: 10,
            ocr_enabled: false,
            ..PipelineConfig::default()
        };
        let extractor = TextExtractor::new(Box::new(FixedBackend("a", Ok("")))).configured(&config);
        assert_eq!(extractor.min_content_chars, 10);
        assert!(!extractor.ocr_enabled);
    }
}
