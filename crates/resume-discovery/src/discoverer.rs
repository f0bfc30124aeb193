use resume_core::{Capabilities, DynamicFields, PipelineConfig};

use crate::{DiscoveryError, clustering, custom_sections, entities, key_value, terminology, topics};

/// Thresholds for dynamic field discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySettings {
    /// Discovery only runs on text strictly longer than this many characters.
    pub min_text_chars: usize,
    /// Paragraphs must be strictly longer than this to be clustered or
    /// topic-modeled.
    pub min_paragraph_chars: usize,
    /// Minimum qualifying paragraphs for clustering and topic modeling.
    pub min_paragraphs: usize,
    /// Fuzzy ratio above which a header counts as a standard section, and
    /// above which two terms count as duplicates.
    pub similarity_threshold: f64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for DiscoverySettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            min_text_chars: config.min_dynamic_chars,
            min_paragraph_chars: config.min_paragraph_chars,
            min_paragraphs: config.min_paragraphs,
            similarity_threshold: 0.8,
        }
    }
}

/// Runs every discovery step and merges whatever succeeds.
#[derive(Debug, Clone, Default)]
pub struct DynamicFieldDiscoverer {
    capabilities: Capabilities,
    settings: DiscoverySettings,
}

impl DynamicFieldDiscoverer {
    /// Missing optional capabilities are reported once here; the steps that
    /// need them are skipped silently afterwards.
    pub fn new(capabilities: Capabilities, settings: DiscoverySettings) -> Self {
        if capabilities.clusterer.is_none() {
            tracing::info!("content clustering disabled: no clusterer registered");
        }
        if capabilities.entity_recognizer.is_none() {
            tracing::info!("entity discovery disabled: no entity recognizer registered");
        }
        if capabilities.topic_modeler.is_none() {
            tracing::info!("topic modeling disabled: no topic modeler registered");
        }
        Self {
            capabilities,
            settings,
        }
    }

    pub fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    /// Whether `text` is long enough for discovery to run at all.
    pub fn should_run(&self, text: &str) -> bool {
        text.chars().count() > self.settings.min_text_chars
    }

    /// Discover dynamic fields. Returns an empty value for text at or below
    /// the length threshold. Never fails: each step's error is logged and
    /// that step contributes nothing.
    pub fn extract_dynamic(&self, text: &str) -> DynamicFields {
        let mut out = DynamicFields::default();
        if !self.should_run(text) {
            tracing::debug!(chars = text.chars().count(), "text too short for dynamic discovery");
            return out;
        }
        let s = &self.settings;

        if let Some(v) = run_step(
            "custom_sections",
            custom_sections::find_custom_sections(text, s.similarity_threshold),
        ) {
            out.custom_sections = v;
        }
        if let Some(v) = run_step("key_value_pairs", key_value::extract_key_values(text)) {
            out.key_value_pairs = v;
        }
        if let Some(v) = run_step(
            "domain_terminology",
            terminology::extract_terminology(text, s.similarity_threshold),
        ) {
            out.domain_terminology = v;
        }

        let clusters = match &self.capabilities.clusterer {
            Some(c) => clustering::cluster_content(text, c.as_ref(), s.min_paragraph_chars, s.min_paragraphs),
            None => Err(DiscoveryError::Unavailable("clusterer")),
        };
        if let Some(v) = run_step("content_clusters", clusters) {
            out.content_clusters = v;
        }

        let found = match &self.capabilities.entity_recognizer {
            Some(r) => entities::recognize_entities(text, r.as_ref()),
            None => Err(DiscoveryError::Unavailable("entity recognizer")),
        };
        if let Some(v) = run_step("entities", found) {
            out.entities = v;
        }

        let fitted = match &self.capabilities.topic_modeler {
            Some(m) => topics::model_topics(text, m.as_ref(), s.min_paragraph_chars, s.min_paragraphs),
            None => Err(DiscoveryError::Unavailable("topic modeler")),
        };
        if let Some(v) = run_step("topics", fitted) {
            out.topics = v;
        }

        out
    }
}

fn run_step<T>(step: &str, result: Result<T, DiscoveryError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(DiscoveryError::Unavailable(_)) => None,
        Err(e) => {
            tracing::debug!(step, error = %e, "discovery step skipped");
            None
        }
    }
}
