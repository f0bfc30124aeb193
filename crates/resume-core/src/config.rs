use serde::{Deserialize, Serialize};

use crate::config_file::ConfigFile;

/// Thresholds the pipeline honors. Passed in by the caller; never read from
/// the environment directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Below this many characters from every text-layer backend, optical
    /// recognition is attempted (default 100).
    pub min_content_chars: usize,
    /// Whether optical recognition may be attempted at all.
    pub ocr_enabled: bool,
    /// Whether dynamic field discovery runs at all.
    pub discovery_enabled: bool,
    /// Discovery only runs on text strictly longer than this (default 200).
    pub min_dynamic_chars: usize,
    /// Paragraphs must be strictly longer than this to be clustered or
    /// topic-modeled (default 50).
    pub min_paragraph_chars: usize,
    /// Minimum qualifying paragraphs for clustering and topic modeling
    /// (default 3).
    pub min_paragraphs: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_content_chars: 100,
            ocr_enabled: true,
            discovery_enabled: true,
            min_dynamic_chars: 200,
            min_paragraph_chars: 50,
            min_paragraphs: 3,
        }
    }
}

impl PipelineConfig {
    /// Apply the values present in a loaded config file over the defaults.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(extraction) = &file.extraction {
            if let Some(n) = extraction.min_content_chars {
                config.min_content_chars = n;
            }
            if let Some(enabled) = extraction.ocr_enabled {
                config.ocr_enabled = enabled;
            }
        }
        if let Some(discovery) = &file.discovery {
            if let Some(enabled) = discovery.enabled {
                config.discovery_enabled = enabled;
            }
            if let Some(n) = discovery.min_text_chars {
                config.min_dynamic_chars = n;
            }
            if let Some(n) = discovery.min_paragraph_chars {
                config.min_paragraph_chars = n;
            }
            if let Some(n) = discovery.min_paragraphs {
                config.min_paragraphs = n;
            }
        }
        config
    }
}
