//! Integration tests for candidate selection, OCR fallback and the end-to-end
//! pipeline, using fake backends injected through the backend traits.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use resume_core::{
    BackendError, Capabilities, OcrBackend, PdfBackend, PipelineConfig, normalize,
};
use resume_ingest::{
    ExtractionError, ExtractionMethod, ResumePipeline, TextExtractor, clean_text,
};
use resume_parsing::FieldExtractor;

struct FakeText {
    name: &'static str,
    result: Result<String, &'static str>,
}

impl FakeText {
    fn ok(name: &'static str, text: &str) -> Box<Self> {
        Box::new(Self {
            name,
            result: Ok(text.to_string()),
        })
    }

    fn unopenable(name: &'static str) -> Box<Self> {
        Box::new(Self {
            name,
            result: Err("not a PDF"),
        })
    }
}

impl PdfBackend for FakeText {
    fn name(&self) -> &str {
        self.name
    }

    fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
        self.result
            .clone()
            .map_err(|e| BackendError::OpenError(e.to_string()))
    }
}

struct FakeOcr {
    available: bool,
    pages: Vec<&'static str>,
    calls: AtomicUsize,
}

impl FakeOcr {
    fn new(available: bool, pages: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            available,
            pages,
            calls: AtomicUsize::new(0),
        })
    }
}

impl OcrBackend for FakeOcr {
    fn name(&self) -> &str {
        "fake-ocr"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn availability_hint(&self) -> String {
        "fake backend switched off".to_string()
    }

    fn ocr_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.iter().map(|p| p.to_string()).collect())
    }
}

fn scratch_pdf() -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    std::fs::write(file.path(), b"%PDF-1.4\n%fake\n").unwrap();
    file
}

const FORTY: &str = "Jane Smith, Software Engineer at Acme Co";

// =============================================================================
// Candidate selection
// =============================================================================

#[test]
fn test_low_content_without_ocr_is_not_an_error() {
    assert_eq!(FORTY.chars().count(), 40);
    let pdf = scratch_pdf();
    let extractor = TextExtractor::new(FakeText::ok("primary", FORTY))
        .with_secondary(FakeText::ok("secondary", FORTY));

    let out = extractor.extract(pdf.path()).unwrap();
    assert!(out.low_content);
    assert_eq!(out.text, FORTY);
    assert_eq!(out.method, ExtractionMethod::PrimaryText);
    assert_eq!(out.candidates.len(), 2);
    assert!(out.candidates.iter().all(|c| c.length == 40), "{:?}", out.candidates);
}

#[test]
fn test_equal_length_prefers_primary() {
    let pdf = scratch_pdf();
    let extractor = TextExtractor::new(FakeText::ok("primary", "alpha beta"))
        .with_secondary(FakeText::ok("secondary", "gamma zeta"));
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(out.method, ExtractionMethod::PrimaryText);
    assert_eq!(out.text, "alpha beta");
}

#[test]
fn test_longer_secondary_wins() {
    let pdf = scratch_pdf();
    let extractor = TextExtractor::new(FakeText::ok("primary", "short"))
        .with_secondary(FakeText::ok("secondary", "considerably longer text"));
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(out.method, ExtractionMethod::SecondaryText);
}

#[test]
fn test_failing_backend_is_empty_candidate() {
    let pdf = scratch_pdf();
    let extractor = TextExtractor::new(FakeText::unopenable("primary"))
        .with_secondary(FakeText::ok("secondary", FORTY));
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(out.method, ExtractionMethod::SecondaryText);
    assert_eq!(out.candidates[0].length, 0);
}

#[test]
fn test_all_backends_unopenable_is_unreadable() {
    let pdf = scratch_pdf();
    let extractor = TextExtractor::new(FakeText::unopenable("primary"))
        .with_secondary(FakeText::unopenable("secondary"));
    let err = extractor.extract(pdf.path()).unwrap_err();
    assert!(
        matches!(err, ExtractionError::DocumentUnreadable { .. }),
        "{:?}",
        err
    );
}

// =============================================================================
// OCR fallback
// =============================================================================

#[test]
fn test_ocr_runs_when_text_layers_starved() {
    let pdf = scratch_pdf();
    let page = "Jane Smith\nSenior Data Scientist with a long history of building models";
    let ocr = FakeOcr::new(true, vec![page, "", page]);
    let extractor = TextExtractor::new(FakeText::ok("primary", ""))
        .with_secondary(FakeText::ok("secondary", "x"))
        .with_ocr(ocr.clone());

    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.method, ExtractionMethod::OpticalRecognition);
    assert_eq!(out.candidates.len(), 3);
    assert_eq!(out.text, format!("{page}\n\n{page}"));
    assert!(!out.low_content);
}

#[test]
fn test_ocr_rescues_unopenable_document() {
    let pdf = scratch_pdf();
    let ocr = FakeOcr::new(true, vec!["Scanned resume text"]);
    let extractor = TextExtractor::new(FakeText::unopenable("primary")).with_ocr(ocr);
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(out.method, ExtractionMethod::OpticalRecognition);
    assert_eq!(out.text, "Scanned resume text");
}

#[test]
fn test_ocr_skipped_when_text_sufficient() {
    let pdf = scratch_pdf();
    let long = "word ".repeat(40);
    let ocr = FakeOcr::new(true, vec!["never used"]);
    let extractor = TextExtractor::new(FakeText::ok("primary", &long)).with_ocr(ocr.clone());
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    assert_eq!(out.method, ExtractionMethod::PrimaryText);
}

#[test]
fn test_unavailable_ocr_is_dropped() {
    let ocr = FakeOcr::new(false, vec!["never used"]);
    let extractor = TextExtractor::new(FakeText::ok("primary", "")).with_ocr(ocr.clone());
    assert!(!extractor.has_ocr());

    let pdf = scratch_pdf();
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    assert!(out.low_content);
}

#[test]
fn test_ocr_disabled_by_config() {
    let config = PipelineConfig {
        ocr_enabled: false,
        ..PipelineConfig::default()
    };
    let ocr = FakeOcr::new(true, vec!["never used"]);
    let extractor = TextExtractor::new(FakeText::ok("primary", FORTY))
        .with_ocr(ocr.clone())
        .configured(&config);
    let pdf = scratch_pdf();
    let out = extractor.extract(pdf.path()).unwrap();
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    assert!(out.low_content);
}

// =============================================================================
// Cleaning feeds section segmentation
// =============================================================================

#[test]
fn test_multi_word_headers_survive_cleaning() {
    let raw = "Jane Smith\nEXPERIENCE\nAcme Corp\nVOLUNTEER EXPERIENCE\nFood bank organizer\nTECHNICAL SKILLS\nPython";
    let cleaned = clean_text(raw);
    let resume = normalize(FieldExtractor::new().extract_fields(&cleaned));

    assert_eq!(resume.experience, vec!["Acme Corp"]);
    assert_eq!(resume.volunteer, vec!["Food bank organizer"]);
    assert!(resume.skills.iter().any(|s| s == "Python"), "{:?}", resume.skills);
}

// =============================================================================
// End-to-end pipeline
// =============================================================================

#[test]
fn test_pipeline_cleans_run_together_sections() {
    let raw = "Jane Smith jane.smith@email.com (555) 123-4567 EDUCATION MIT, BS Computer Science SKILLS Python, Docker, AWS";
    let config = PipelineConfig::default();
    let extractor = TextExtractor::new(FakeText::ok("primary", raw)).configured(&config);
    let pipeline = ResumePipeline::with_extractor(extractor, &config, Capabilities::none());

    let pdf = scratch_pdf();
    let out = pipeline.parse_path(pdf.path()).unwrap();
    let resume = &out.resume;
    assert_eq!(resume.email, "jane.smith@email.com");
    assert_eq!(resume.phone, "(555) 123-4567");
    for skill in ["Python", "Docker", "AWS"] {
        assert!(resume.skills.iter().any(|s| s == skill), "{:?}", resume.skills);
    }
    assert!(
        resume.education.iter().any(|e| e.contains("MIT")),
        "{:?}",
        resume.education
    );
}

#[test]
fn test_pipeline_bytes_roundtrip_through_tempfile() {
    let config = PipelineConfig::default();
    let extractor = TextExtractor::new(FakeText::ok("primary", "Jane Smith\njane@example.com"))
        .configured(&config);
    let pipeline = ResumePipeline::with_extractor(extractor, &config, Capabilities::none());

    let out = pipeline.parse_bytes(b"%PDF-1.7\nfake body").unwrap();
    assert_eq!(out.resume.email, "jane@example.com");
    assert!(out.extracted.low_content);
}

#[test]
fn test_pipeline_missing_file_is_unreadable() {
    let pipeline = ResumePipeline::with_extractor(
        TextExtractor::new(FakeText::ok("primary", "text")),
        &PipelineConfig::default(),
        Capabilities::none(),
    );
    let err = pipeline
        .parse_path(Path::new("/nonexistent/resume.pdf"))
        .unwrap_err();
    assert!(
        matches!(err, ExtractionError::DocumentUnreadable { .. }),
        "{:?}",
        err
    );
}
