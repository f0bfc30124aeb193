use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod backend;
pub mod capability;
pub mod config;
pub mod config_file;
pub mod normalize;
pub mod text_utils;

pub use backend::{BackendError, OcrBackend, PdfBackend};
pub use capability::{
    Capabilities, CapabilityError, ClusterAssignment, Clusterer, EntityRecognizer,
    RecognizedEntity, TopicModeler,
};
pub use config::PipelineConfig;
pub use config_file::{ConfigError, ConfigFile};
pub use normalize::normalize;

/// Whether a canonical field holds one string or a list of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    List,
}

/// The fixed set of attributes every [`ParsedResume`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
    Email,
    Phone,
    Linkedin,
    Websites,
    Location,
    Skills,
    Industry,
    JobTitles,
    YearsOfExperience,
    Summary,
    Education,
    Experience,
    Projects,
    Certifications,
    Achievements,
    Publications,
    Languages,
    Volunteer,
    Timeline,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 20] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Linkedin,
        Self::Websites,
        Self::Location,
        Self::Skills,
        Self::Industry,
        Self::JobTitles,
        Self::YearsOfExperience,
        Self::Summary,
        Self::Education,
        Self::Experience,
        Self::Projects,
        Self::Certifications,
        Self::Achievements,
        Self::Publications,
        Self::Languages,
        Self::Volunteer,
        Self::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Linkedin => "linkedin",
            Self::Websites => "websites",
            Self::Location => "location",
            Self::Skills => "skills",
            Self::Industry => "industry",
            Self::JobTitles => "job_titles",
            Self::YearsOfExperience => "years_of_experience",
            Self::Summary => "summary",
            Self::Education => "education",
            Self::Experience => "experience",
            Self::Projects => "projects",
            Self::Certifications => "certifications",
            Self::Achievements => "achievements",
            Self::Publications => "publications",
            Self::Languages => "languages",
            Self::Volunteer => "volunteer",
            Self::Timeline => "timeline",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Name
            | Self::Email
            | Self::Phone
            | Self::Linkedin
            | Self::Location
            | Self::YearsOfExperience
            | Self::Summary => FieldKind::Scalar,
            _ => FieldKind::List,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loosely typed field value as produced by the extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

/// Field extractor output: any subset of canonical keys, not yet normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialResume {
    fields: BTreeMap<CanonicalField, FieldValue>,
    pub dynamic_fields: Option<DynamicFields>,
}

impl PartialResume {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: CanonicalField, value: impl Into<FieldValue>) {
        self.fields.insert(field, value.into());
    }

    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Get a scalar field as `&str` (lists are not flattened).
    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        match self.fields.get(&field) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get a list field as a slice.
    pub fn list(&self, field: CanonicalField) -> Option<&[String]> {
        match self.fields.get(&field) {
            Some(FieldValue::List(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<CanonicalField, FieldValue>, Option<DynamicFields>) {
        (self.fields, self.dynamic_fields)
    }

    /// Build a partial resume from loosely typed JSON (e.g. a stored document).
    ///
    /// Unknown keys are ignored. Nulls and `false` are treated as absent,
    /// numbers and `true` are stringified, and arrays keep their non-null
    /// scalar elements. A `dynamic_fields` object is kept if it deserializes.
    pub fn from_json(value: &Value) -> Self {
        let mut partial = PartialResume::new();
        let Some(obj) = value.as_object() else {
            return partial;
        };

        for (key, v) in obj {
            if key == "dynamic_fields" {
                partial.dynamic_fields = serde_json::from_value(v.clone()).ok();
                continue;
            }
            let Some(field) = CanonicalField::from_name(key) else {
                continue;
            };
            match v {
                Value::Array(items) => {
                    let list: Vec<String> = items.iter().filter_map(json_scalar_to_string).collect();
                    partial.insert(field, list);
                }
                other => {
                    if let Some(s) = json_scalar_to_string(other) {
                        partial.insert(field, s);
                    }
                }
            }
        }
        partial
    }
}

fn json_scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// The canonical, fully populated output of the pipeline.
///
/// Every key is always present when serialized; scalars default to `""` and
/// lists to `[]`. `dynamic_fields` is only emitted when discovery produced
/// something.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub websites: Vec<String>,
    pub location: String,
    pub skills: Vec<String>,
    pub industry: Vec<String>,
    pub job_titles: Vec<String>,
    pub years_of_experience: String,
    pub summary: String,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
    pub publications: Vec<String>,
    pub languages: Vec<String>,
    pub volunteer: Vec<String>,
    pub timeline: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_fields: Option<DynamicFields>,
}

impl ParsedResume {
    pub fn scalar(&self, field: CanonicalField) -> Option<&str> {
        let s = match field {
            CanonicalField::Name => &self.name,
            CanonicalField::Email => &self.email,
            CanonicalField::Phone => &self.phone,
            CanonicalField::Linkedin => &self.linkedin,
            CanonicalField::Location => &self.location,
            CanonicalField::YearsOfExperience => &self.years_of_experience,
            CanonicalField::Summary => &self.summary,
            _ => return None,
        };
        Some(s.as_str())
    }

    pub fn list(&self, field: CanonicalField) -> Option<&[String]> {
        let v = match field {
            CanonicalField::Websites => &self.websites,
            CanonicalField::Skills => &self.skills,
            CanonicalField::Industry => &self.industry,
            CanonicalField::JobTitles => &self.job_titles,
            CanonicalField::Education => &self.education,
            CanonicalField::Experience => &self.experience,
            CanonicalField::Projects => &self.projects,
            CanonicalField::Certifications => &self.certifications,
            CanonicalField::Achievements => &self.achievements,
            CanonicalField::Publications => &self.publications,
            CanonicalField::Languages => &self.languages,
            CanonicalField::Volunteer => &self.volunteer,
            CanonicalField::Timeline => &self.timeline,
            _ => return None,
        };
        Some(v.as_slice())
    }

    pub(crate) fn scalar_mut(&mut self, field: CanonicalField) -> Option<&mut String> {
        match field {
            CanonicalField::Name => Some(&mut self.name),
            CanonicalField::Email => Some(&mut self.email),
            CanonicalField::Phone => Some(&mut self.phone),
            CanonicalField::Linkedin => Some(&mut self.linkedin),
            CanonicalField::Location => Some(&mut self.location),
            CanonicalField::YearsOfExperience => Some(&mut self.years_of_experience),
            CanonicalField::Summary => Some(&mut self.summary),
            _ => None,
        }
    }

    pub(crate) fn list_mut(&mut self, field: CanonicalField) -> Option<&mut Vec<String>> {
        match field {
            CanonicalField::Websites => Some(&mut self.websites),
            CanonicalField::Skills => Some(&mut self.skills),
            CanonicalField::Industry => Some(&mut self.industry),
            CanonicalField::JobTitles => Some(&mut self.job_titles),
            CanonicalField::Education => Some(&mut self.education),
            CanonicalField::Experience => Some(&mut self.experience),
            CanonicalField::Projects => Some(&mut self.projects),
            CanonicalField::Certifications => Some(&mut self.certifications),
            CanonicalField::Achievements => Some(&mut self.achievements),
            CanonicalField::Publications => Some(&mut self.publications),
            CanonicalField::Languages => Some(&mut self.languages),
            CanonicalField::Volunteer => Some(&mut self.volunteer),
            CanonicalField::Timeline => Some(&mut self.timeline),
            _ => None,
        }
    }
}

/// A key-value pair's value: numeric for a fixed set of keys, text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Number(f64),
    Text(String),
}

impl KeyValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Number(n) => Some(*n),
            KeyValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            KeyValue::Text(s) => Some(s.as_str()),
            KeyValue::Number(_) => None,
        }
    }
}

/// One latent topic with its highest-weighted terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: usize,
    pub terms: Vec<String>,
}

/// Best-effort structure recovered beyond the canonical fields.
///
/// Each member is only serialized when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicFields {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_sections: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub key_value_pairs: BTreeMap<String, KeyValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_terminology: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content_clusters: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub entities: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Topic>,
}

impl DynamicFields {
    pub fn is_empty(&self) -> bool {
        self.custom_sections.is_empty()
            && self.key_value_pairs.is_empty()
            && self.domain_terminology.is_empty()
            && self.content_clusters.is_empty()
            && self.entities.is_empty()
            && self.topics.is_empty()
    }
}

/// Which backend produced a text candidate. Declaration order is the
/// tie-break order for winner selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PrimaryText,
    SecondaryText,
    OpticalRecognition,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtractionMethod::PrimaryText => "primary text",
            ExtractionMethod::SecondaryText => "secondary text",
            ExtractionMethod::OpticalRecognition => "optical recognition",
        };
        f.write_str(label)
    }
}

/// Raw output of one extraction backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionCandidate {
    pub method: ExtractionMethod,
    pub text: String,
    /// Length in characters, not bytes.
    pub length: usize,
}

impl ExtractionCandidate {
    pub fn new(method: ExtractionMethod, text: String) -> Self {
        let length = text.chars().count();
        Self {
            method,
            text,
            length,
        }
    }

    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            method: self.method,
            length: self.length,
        }
    }
}

/// What remains of a candidate after the winner is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub method: ExtractionMethod,
    pub length: usize,
}

/// Cleaned text plus a report of how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub candidates: Vec<CandidateSummary>,
    /// Every text-layer backend fell short of the minimum-content threshold
    /// and no optical recognition could make up for it.
    pub low_content: bool,
}

impl ExtractedText {
    /// First `max_chars` characters, with `...` appended when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.text.chars().count() > max_chars {
            let head: String = self.text.chars().take(max_chars).collect();
            format!("{head}...")
        } else {
            self.text.clone()
        }
    }
}
