//! Optional analysis capabilities used by dynamic field discovery.
//!
//! Each capability is a trait object registered in [`Capabilities`] at
//! pipeline construction. A missing capability disables only the step that
//! needs it.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::Topic;
use crate::backend::OcrBackend;

#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("not enough input: {0}")]
    InsufficientInput(String),
    #[error("{0}")]
    Failed(String),
}

/// A raw entity as produced by a recognizer, before label remapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedEntity {
    pub text: String,
    /// Raw type code, e.g. `ORG`, `GPE`, `PERSON`, `DATE`, `MONEY`.
    pub label: String,
}

/// Named entity recognition over a whole document.
pub trait EntityRecognizer: Send + Sync {
    fn name(&self) -> &str;

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, CapabilityError>;
}

/// Output of a clustering run: one cluster index per input document plus the
/// top centroid terms of each cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub assignments: Vec<usize>,
    pub cluster_terms: Vec<Vec<String>>,
}

/// Groups documents into `k` clusters.
pub trait Clusterer: Send + Sync {
    fn name(&self) -> &str;

    fn cluster(&self, documents: &[&str], k: usize) -> Result<ClusterAssignment, CapabilityError>;
}

/// Fits a latent topic model over pre-tokenized documents.
pub trait TopicModeler: Send + Sync {
    fn name(&self) -> &str;

    fn fit(
        &self,
        documents: &[Vec<String>],
        num_topics: usize,
    ) -> Result<Vec<Topic>, CapabilityError>;
}

/// Registry of optional backends, passed into the pipeline at construction.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub ocr: Option<Arc<dyn OcrBackend>>,
    pub clusterer: Option<Arc<dyn Clusterer>>,
    pub entity_recognizer: Option<Arc<dyn EntityRecognizer>>,
    pub topic_modeler: Option<Arc<dyn TopicModeler>>,
}

impl Capabilities {
    /// No optional capabilities at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_ocr(mut self, ocr: Arc<dyn OcrBackend>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn with_clusterer(mut self, clusterer: Arc<dyn Clusterer>) -> Self {
        self.clusterer = Some(clusterer);
        self
    }

    pub fn with_entity_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.entity_recognizer = Some(recognizer);
        self
    }

    pub fn with_topic_modeler(mut self, modeler: Arc<dyn TopicModeler>) -> Self {
        self.topic_modeler = Some(modeler);
        self
    }

    pub fn without_ocr(mut self) -> Self {
        self.ocr = None;
        self
    }

    pub fn without_clusterer(mut self) -> Self {
        self.clusterer = None;
        self
    }

    pub fn without_entity_recognizer(mut self) -> Self {
        self.entity_recognizer = None;
        self
    }

    pub fn without_topic_modeler(mut self) -> Self {
        self.topic_modeler = None;
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("ocr", &self.ocr.as_ref().map(|b| b.name().to_string()))
            .field(
                "clusterer",
                &self.clusterer.as_ref().map(|b| b.name().to_string()),
            )
            .field(
                "entity_recognizer",
                &self.entity_recognizer.as_ref().map(|b| b.name().to_string()),
            )
            .field(
                "topic_modeler",
                &self.topic_modeler.as_ref().map(|b| b.name().to_string()),
            )
            .finish()
    }
}
