use std::io::Write;
use std::path::Path;

use resume_core::{Capabilities, ExtractedText, ParsedResume, PipelineConfig, normalize};
use resume_discovery::{DiscoverySettings, DynamicFieldDiscoverer};
use resume_parsing::FieldExtractor;

use crate::{ExtractionError, TextExtractor};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A parsed resume together with the extraction report it came from.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub resume: ParsedResume,
    pub extracted: ExtractedText,
}

/// End-to-end parser: text extraction, field rules, dynamic discovery and
/// normalization.
///
/// Holds no per-request state; one instance can serve concurrent callers.
#[derive(Debug)]
pub struct ResumePipeline {
    extractor: TextExtractor,
    fields: FieldExtractor,
    discoverer: Option<DynamicFieldDiscoverer>,
}

impl ResumePipeline {
    /// Build with the default text backends, the OCR backend from
    /// `capabilities` (if any) and the given thresholds.
    pub fn new(config: &PipelineConfig, capabilities: Capabilities) -> Self {
        let mut extractor = TextExtractor::with_default_backends().configured(config);
        if config.ocr_enabled {
            if let Some(ocr) = capabilities.ocr.clone() {
                extractor = extractor.with_ocr(ocr);
            }
        }
        Self::with_extractor(extractor, config, capabilities)
    }

    /// Build around a caller-assembled extractor.
    pub fn with_extractor(
        extractor: TextExtractor,
        config: &PipelineConfig,
        capabilities: Capabilities,
    ) -> Self {
        let discoverer = config.discovery_enabled.then(|| {
            DynamicFieldDiscoverer::new(capabilities, DiscoverySettings::from(config))
        });
        Self {
            extractor,
            fields: FieldExtractor::new(),
            discoverer,
        }
    }

    /// Replace the field extractor, e.g. one built with extra dictionary
    /// terms.
    pub fn with_field_extractor(mut self, fields: FieldExtractor) -> Self {
        self.fields = fields;
        self
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    pub fn discovery_enabled(&self) -> bool {
        self.discoverer.is_some()
    }

    /// Parse a PDF on disk. Only an unreadable document is an error.
    pub fn parse_path(&self, path: &Path) -> Result<PipelineOutput, ExtractionError> {
        let extracted = self.extractor.extract(path)?;
        tracing::info!(
            path = %path.display(),
            method = %extracted.method,
            chars = extracted.text.chars().count(),
            "text extracted"
        );
        let resume = self.parse_text(&extracted.text);
        Ok(PipelineOutput { resume, extracted })
    }

    /// Parse PDF bytes by spooling them to a temporary file, removed on
    /// return.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<PipelineOutput, ExtractionError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ExtractionError::NotPdf);
        }
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        self.parse_path(file.path())
    }

    /// Run the field rules and discovery over already-extracted text.
    pub fn parse_text(&self, text: &str) -> ParsedResume {
        let mut partial = self.fields.extract_fields(text);
        if let Some(discoverer) = &self.discoverer {
            let dynamic = discoverer.extract_dynamic(text);
            if !dynamic.is_empty() {
                partial.dynamic_fields = Some(dynamic);
            }
        }
        tracing::debug!(fields = partial.len(), "fields extracted");
        normalize(partial)
    }
}

impl Default for ResumePipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default(), Capabilities::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LopdfBackend;

    fn text_only(config: &PipelineConfig) -> ResumePipeline {
        let extractor = TextExtractor::new(Box::new(LopdfBackend::new())).configured(config);
        ResumePipeline::with_extractor(extractor, config, Capabilities::none())
    }

    #[test]
    fn test_parse_bytes_rejects_non_pdf() {
        let pipeline = text_only(&PipelineConfig::default());
        let err = pipeline.parse_bytes(b"PK\x03\x04 not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::NotPdf), "{:?}", err);
    }

    #[test]
    fn test_parse_text_scenario_a() {
        let pipeline = text_only(&PipelineConfig::default());
        let resume = pipeline.parse_text(
            "Jane Smith\njane.smith@email.com\n(555) 123-4567\n\nEDUCATION\nMIT, BS Computer Science\n\nSKILLS\nPython, Docker, AWS",
        );
        assert_eq!(resume.name, "Jane Smith");
        assert_eq!(resume.email, "jane.smith@email.com");
        assert_eq!(resume.phone, "(555) 123-4567");
        assert!(resume.skills.iter().any(|s| s == "Docker"), "{:?}", resume.skills);
    }

    #[test]
    fn test_discovery_disabled() {
        let config = PipelineConfig {
            discovery_enabled: false,
            ..PipelineConfig::default()
        };
        let pipeline = text_only(&config);
        assert!(!pipeline.discovery_enabled());
        let text = "GPA: 3.8\n".repeat(40);
        assert!(pipeline.parse_text(&text).dynamic_fields.is_none());
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResumePipeline>();
    }
}
