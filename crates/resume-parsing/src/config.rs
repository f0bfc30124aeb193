use std::collections::HashSet;

use regex::Regex;
use resume_core::config_file::DictionariesConfig;

use crate::dictionaries::{DictionaryMatcher, INDUSTRIES, JOB_TITLE_KEYWORDS, REGION_CODES, SKILLS};

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }

    fn is_default(&self) -> bool {
        matches!(self, ListOverride::Default)
    }
}

/// Configuration for the field extractor.
///
/// Regex and dictionary fields are `Option`; `None` means "use the built-in
/// default". Use [`ParsingConfigBuilder`] to construct from strings.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── contact rules ──
    pub(crate) email_re: Option<Regex>,
    pub(crate) phone_re: Option<Regex>,
    /// Maximum number of websites kept, in document order (default: 3).
    pub(crate) max_websites: usize,

    // ── dictionaries ──
    pub(crate) skills: Option<DictionaryMatcher>,
    pub(crate) industries: Option<DictionaryMatcher>,
    /// Lowercased job title keywords.
    pub(crate) title_keywords: Option<HashSet<String>>,

    // ── location ──
    /// Uppercase region codes accepted after `City, `; `None` accepts any
    /// two capital letters.
    pub(crate) region_codes: Option<HashSet<String>>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            email_re: None,
            phone_re: None,
            max_websites: 3,
            skills: None,
            industries: None,
            title_keywords: None,
            region_codes: None,
        }
    }
}

impl ParsingConfig {
    pub fn max_websites(&self) -> usize {
        self.max_websites
    }
}

/// Builder for [`ParsingConfig`].
///
/// Patterns and dictionary overrides are compiled in [`build()`](Self::build),
/// which fails fast with `regex::Error` on an invalid pattern.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    email_re: Option<String>,
    phone_re: Option<String>,
    max_websites: Option<usize>,
    skills: ListOverride<String>,
    industries: ListOverride<String>,
    title_keywords: ListOverride<String>,
    region_codes: Option<Vec<String>>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `[dictionaries]` section of a config file: every
    /// `extra_*` list extends the built-in defaults.
    pub fn from_dictionaries(config: &DictionariesConfig) -> Self {
        let mut builder = Self::new();
        for skill in config.extra_skills.iter().flatten() {
            builder.skills.push(skill.clone());
        }
        for industry in config.extra_industries.iter().flatten() {
            builder.industries.push(industry.clone());
        }
        for title in config.extra_job_titles.iter().flatten() {
            builder.title_keywords.push(title.clone());
        }
        builder.region_codes = config.region_codes.clone();
        builder
    }

    // ── Contact patterns ──

    pub fn email_regex(mut self, pattern: &str) -> Self {
        self.email_re = Some(pattern.to_string());
        self
    }

    pub fn phone_regex(mut self, pattern: &str) -> Self {
        self.phone_re = Some(pattern.to_string());
        self
    }

    pub fn max_websites(mut self, n: usize) -> Self {
        self.max_websites = Some(n);
        self
    }

    // ── Skills ──

    pub fn set_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = ListOverride::Replace(skills);
        self
    }

    pub fn add_skill(mut self, skill: String) -> Self {
        self.skills.push(skill);
        self
    }

    // ── Industries ──

    pub fn set_industries(mut self, industries: Vec<String>) -> Self {
        self.industries = ListOverride::Replace(industries);
        self
    }

    pub fn add_industry(mut self, industry: String) -> Self {
        self.industries.push(industry);
        self
    }

    // ── Job title keywords ──

    pub fn set_job_title_keywords(mut self, keywords: Vec<String>) -> Self {
        self.title_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_job_title_keyword(mut self, keyword: String) -> Self {
        self.title_keywords.push(keyword);
        self
    }

    // ── Location ──

    /// Only accept `City, ST` locations whose region code is in `codes`.
    pub fn region_codes(mut self, codes: Vec<String>) -> Self {
        self.region_codes = Some(codes);
        self
    }

    /// Only accept US state and Canadian province codes.
    pub fn known_regions_only(self) -> Self {
        self.region_codes(REGION_CODES.iter().map(|c| c.to_string()).collect())
    }

    /// Compile all patterns and dictionaries into a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        let compile_dictionary = |list: ListOverride<String>,
                                  defaults: &[&str]|
         -> Result<Option<DictionaryMatcher>, regex::Error> {
            if list.is_default() {
                return Ok(None);
            }
            let defaults: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
            DictionaryMatcher::new(&list.resolve(&defaults)).map(Some)
        };

        let title_keywords = if self.title_keywords.is_default() {
            None
        } else {
            let defaults: Vec<String> = JOB_TITLE_KEYWORDS.iter().map(|s| s.to_string()).collect();
            Some(
                self.title_keywords
                    .resolve(&defaults)
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            )
        };

        Ok(ParsingConfig {
            email_re: compile(self.email_re)?,
            phone_re: compile(self.phone_re)?,
            max_websites: self.max_websites.unwrap_or(3),
            skills: compile_dictionary(self.skills, SKILLS)?,
            industries: compile_dictionary(self.industries, INDUSTRIES)?,
            title_keywords,
            region_codes: self.region_codes.map(|codes| {
                codes
                    .iter()
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty())
                    .collect()
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.max_websites, 3);
        assert!(config.skills.is_none());
        assert!(config.title_keywords.is_none());
        assert!(config.region_codes.is_none());
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .max_websites(5)
            .phone_regex(r"\d{3}-\d{4}")
            .build()
            .unwrap();
        assert_eq!(config.max_websites(), 5);
        assert!(config.phone_re.is_some());
        assert!(config.email_re.is_none());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new().email_regex(r"[invalid").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_extends_skills() {
        let config = ParsingConfigBuilder::new()
            .add_skill("Nix".to_string())
            .build()
            .unwrap();
        let skills = config.skills.unwrap();
        assert!(skills.terms().iter().any(|t| t == "Nix"));
        assert!(skills.terms().iter().any(|t| t == "Python"));
    }

    #[test]
    fn test_builder_replaces_industries() {
        let config = ParsingConfigBuilder::new()
            .set_industries(vec!["Maritime".to_string()])
            .build()
            .unwrap();
        assert_eq!(config.industries.unwrap().terms(), ["Maritime".to_string()]);
    }

    #[test]
    fn test_from_dictionaries() {
        let dictionaries = DictionariesConfig {
            extra_job_titles: Some(vec!["Wrangler".to_string()]),
            ..Default::default()
        };
        let config = ParsingConfigBuilder::from_dictionaries(&dictionaries)
            .build()
            .unwrap();
        let keywords = config.title_keywords.unwrap();
        assert!(keywords.contains("wrangler"));
        assert!(keywords.contains("engineer"));
        assert!(config.skills.is_none());
    }

    #[test]
    fn test_builder_region_codes() {
        let config = ParsingConfigBuilder::new()
            .region_codes(vec![" de".to_string(), "AU".to_string()])
            .build()
            .unwrap();
        let regions = config.region_codes.unwrap();
        assert!(regions.contains("DE"), "{:?}", regions);
        assert!(regions.contains("AU"), "{:?}", regions);

        let known = ParsingConfigBuilder::new().known_regions_only().build().unwrap();
        let regions = known.region_codes.unwrap();
        assert!(regions.contains("CA"));
        assert!(!regions.contains("AU"));
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
