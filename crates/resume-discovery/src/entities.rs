use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use resume_core::text_utils::dedup_case_insensitive;
use resume_core::{CapabilityError, EntityRecognizer, RecognizedEntity};
use resume_parsing::dictionaries::REGION_CODES;
use resume_parsing::tagger::{self, EntityKind};

use crate::DiscoveryError;

const MIN_ENTITY_CHARS: usize = 3;

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:[A-Z][\w&'-]*\s+){0,4}(?:Inc\.?|Corp\.?|Corporation|LLC|Ltd\.?|Company|Group|Technologies|Labs|Systems|Solutions|Bank|Hospital|Foundation)(?:\W|$)|\b(?:University|Institute|College)\s+of\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*",
    )
    .unwrap()
});

static CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:[ ][A-Z][a-z]+)*),[ ]?([A-Z]{2})\b").unwrap()
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{4}\b").unwrap()
});

static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:[kKmMbB]\b|million\b|billion\b))?|\b\d[\d,]*(?:\.\d+)?\s?(?:USD|EUR|GBP|dollars)\b").unwrap()
});

/// Pattern and tagger based recognizer emitting `ORG`, `GPE`, `PERSON`,
/// `DATE` and `MONEY` entities.
#[derive(Debug, Clone, Default)]
pub struct RegexEntityRecognizer;

impl RegexEntityRecognizer {
    pub fn new() -> Self {
        Self
    }
}

fn entity(text: &str, label: &str) -> RecognizedEntity {
    RecognizedEntity {
        text: text.trim().trim_end_matches([',', ';', ':', '(', ')']).trim().to_string(),
        label: label.to_string(),
    }
}

impl EntityRecognizer for RegexEntityRecognizer {
    fn name(&self) -> &str {
        "regex-ner"
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, CapabilityError> {
        let mut found = Vec::new();

        found.extend(ORG_RE.find_iter(text).map(|m| entity(m.as_str(), "ORG")));

        for chunk in tagger::entities(text) {
            let label = match chunk.kind {
                EntityKind::Person => "PERSON",
                EntityKind::Organization => "ORG",
                EntityKind::Gpe => "GPE",
            };
            found.push(entity(&chunk.text, label));
        }

        for caps in CITY_STATE_RE.captures_iter(text) {
            if REGION_CODES.contains(&&caps[2]) {
                found.push(entity(&caps[0], "GPE"));
            }
        }

        found.extend(DATE_RE.find_iter(text).map(|m| entity(m.as_str(), "DATE")));
        found.extend(MONEY_RE.find_iter(text).map(|m| entity(m.as_str(), "MONEY")));

        Ok(found)
    }
}

/// Friendlier group name for a raw entity label.
pub fn remap_label(label: &str) -> String {
    match label {
        "ORG" | "ORGANIZATION" => "organizations".to_string(),
        "GPE" | "LOC" | "LOCATION" => "locations".to_string(),
        "PERSON" => "people".to_string(),
        "DATE" => "dates".to_string(),
        "MONEY" => "financial".to_string(),
        other => other.to_lowercase(),
    }
}

/// Document-level entities grouped by remapped type, short entities
/// dropped, deduplicated per type.
pub fn recognize_entities(
    text: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<BTreeMap<String, Vec<String>>, DiscoveryError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for e in recognizer.recognize(text)? {
        let value = e.text.trim();
        if value.chars().count() < MIN_ENTITY_CHARS {
            continue;
        }
        grouped
            .entry(remap_label(&e.label))
            .or_default()
            .push(value.to_string());
    }
    for values in grouped.values_mut() {
        *values = dedup_case_insensitive(std::mem::take(values));
    }
    Ok(grouped)
}
