//! Secondary pass over long resume text that recovers structure the fixed
//! canonical fields miss.
//!
//! Every step is independent. A step that fails, or whose capability is not
//! registered, contributes nothing and the others still run.

use std::sync::Arc;

use resume_core::{Capabilities, CapabilityError};
use thiserror::Error;

pub mod clustering;
pub mod custom_sections;
pub mod discoverer;
pub mod entities;
pub mod key_value;
pub mod terminology;
pub mod topics;

pub use clustering::TfIdfKMeans;
pub use discoverer::{DiscoverySettings, DynamicFieldDiscoverer};
pub use entities::RegexEntityRecognizer;
pub use topics::LdaTopicModeler;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("{0}: no capability registered")]
    Unavailable(&'static str),
    #[error("not enough input: {0}")]
    InsufficientInput(String),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// The built-in clusterer, entity recognizer and topic modeler. OCR is not
/// included; it lives with the text extraction backends.
pub fn builtin_capabilities() -> Capabilities {
    Capabilities::none()
        .with_clusterer(Arc::new(TfIdfKMeans::default()))
        .with_entity_recognizer(Arc::new(RegexEntityRecognizer::new()))
        .with_topic_modeler(Arc::new(LdaTopicModeler::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_capabilities_registered() {
        let caps = builtin_capabilities();
        assert!(caps.ocr.is_none());
        assert_eq!(caps.clusterer.as_ref().map(|c| c.name()), Some("tfidf-kmeans"));
        assert_eq!(caps.entity_recognizer.as_ref().map(|c| c.name()), Some("regex-ner"));
        assert_eq!(caps.topic_modeler.as_ref().map(|c| c.name()), Some("lda-gibbs"));
    }
}
