use resume_core::CanonicalField;
use thiserror::Error;

pub mod config;
pub mod dictionaries;
pub mod extractor;
pub mod fields;
pub mod section;
pub mod tagger;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use dictionaries::{DictionaryMatcher, standard_section_names};
pub use extractor::FieldExtractor;
pub use section::{SectionState, Sections, detect_header, segment_sections};

/// A single field rule failed. The extractor logs it and omits the field.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("{field}: invalid value {value:?}: {reason}")]
    InvalidValue {
        field: CanonicalField,
        value: String,
        reason: String,
    },
}

/// Extract canonical fields from cleaned resume text with the default
/// configuration.
pub fn extract_fields(text: &str) -> resume_core::PartialResume {
    FieldExtractor::new().extract_fields(text)
}
