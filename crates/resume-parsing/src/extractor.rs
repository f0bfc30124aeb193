use resume_core::{CanonicalField, FieldValue, PartialResume};

use crate::config::ParsingConfig;
use crate::dictionaries::{DEFAULT_INDUSTRIES, DEFAULT_SKILLS, DEFAULT_TITLE_KEYWORDS};
use crate::section::{self, Sections};
use crate::{FieldError, fields};

/// Sections whose lines become list fields as-is.
const LIST_SECTIONS: &[CanonicalField] = &[
    CanonicalField::Education,
    CanonicalField::Experience,
    CanonicalField::Projects,
    CanonicalField::Certifications,
    CanonicalField::Achievements,
    CanonicalField::Publications,
    CanonicalField::Languages,
    CanonicalField::Volunteer,
];

/// Applies every field rule to cleaned text.
///
/// Holds a [`ParsingConfig`]; the default constructor uses the built-in
/// dictionaries and patterns. Extraction is pure: the same text always
/// yields the same [`PartialResume`].
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    config: ParsingConfig,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Split text into canonical sections.
    pub fn segment_sections(&self, text: &str) -> Sections {
        section::segment_sections(text)
    }

    /// Run every rule. A failing rule is logged at debug level and its field
    /// omitted; the other rules still run.
    pub fn extract_fields(&self, text: &str) -> PartialResume {
        let mut partial = PartialResume::new();
        if text.trim().is_empty() {
            return partial;
        }

        let config = &self.config;
        let skills = config.skills.as_ref().unwrap_or(&DEFAULT_SKILLS);
        let industries = config.industries.as_ref().unwrap_or(&DEFAULT_INDUSTRIES);
        let title_keywords = config.title_keywords.as_ref().unwrap_or(&DEFAULT_TITLE_KEYWORDS);

        set_scalar(&mut partial, CanonicalField::Name, fields::extract_name(text));
        set_scalar(
            &mut partial,
            CanonicalField::Email,
            fields::extract_email(text, config.email_re.as_ref()),
        );
        set_scalar(
            &mut partial,
            CanonicalField::Phone,
            fields::extract_phone(text, config.phone_re.as_ref()),
        );
        set_scalar(&mut partial, CanonicalField::Linkedin, fields::extract_linkedin(text));
        set_list(
            &mut partial,
            CanonicalField::Websites,
            fields::extract_websites(text, config.max_websites),
        );
        set_scalar(
            &mut partial,
            CanonicalField::Location,
            fields::extract_location(text, config.region_codes.as_ref()),
        );
        set_list(
            &mut partial,
            CanonicalField::Skills,
            fields::extract_dictionary_terms(text, skills),
        );
        set_list(
            &mut partial,
            CanonicalField::Industry,
            fields::extract_dictionary_terms(text, industries),
        );
        set_list(
            &mut partial,
            CanonicalField::JobTitles,
            fields::extract_job_titles(text, title_keywords),
        );
        set_scalar(
            &mut partial,
            CanonicalField::YearsOfExperience,
            fields::extract_years_of_experience(text),
        );
        set_list(&mut partial, CanonicalField::Timeline, fields::extract_timeline(text));

        let sections = self.segment_sections(text);
        if let Some(lines) = sections.get(CanonicalField::Summary) {
            if !lines.is_empty() {
                partial.insert(CanonicalField::Summary, lines.join(" "));
            }
        }
        for &field in LIST_SECTIONS {
            if let Some(lines) = sections.get(field) {
                if !lines.is_empty() {
                    partial.insert(field, lines.to_vec());
                }
            }
        }

        partial
    }
}

fn set_scalar(partial: &mut PartialResume, field: CanonicalField, result: Result<Option<String>, FieldError>) {
    match result {
        Ok(Some(value)) if !value.is_empty() => partial.insert(field, FieldValue::Text(value)),
        Ok(_) => {}
        Err(e) => tracing::debug!(field = %field, error = %e, "field rule failed"),
    }
}

fn set_list(partial: &mut PartialResume, field: CanonicalField, result: Result<Vec<String>, FieldError>) {
    match result {
        Ok(values) if !values.is_empty() => partial.insert(field, FieldValue::List(values)),
        Ok(_) => {}
        Err(e) => tracing::debug!(field = %field, error = %e, "field rule failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;

    #[test]
    fn test_empty_text_yields_nothing() {
        let partial = FieldExtractor::new().extract_fields("   \n\n ");
        assert!(partial.is_empty());
        assert!(partial.dynamic_fields.is_none());
    }

    #[test]
    fn test_failed_rule_omits_only_that_field() {
        let text = "Jane Smith\n99999999999999999999 years of experience\njane@x.com";
        let partial = FieldExtractor::new().extract_fields(text);
        assert!(!partial.contains(CanonicalField::YearsOfExperience));
        assert_eq!(partial.text(CanonicalField::Name), Some("Jane Smith"));
        assert_eq!(partial.text(CanonicalField::Email), Some("jane@x.com"));
    }

    #[test]
    fn test_custom_skill_dictionary() {
        let config = ParsingConfigBuilder::new()
            .set_skills(vec!["Underwater Welding".to_string()])
            .build()
            .unwrap();
        let extractor = FieldExtractor::with_config(config);
        let partial = extractor.extract_fields("Python dev, certified in underwater welding.");
        assert_eq!(
            partial.list(CanonicalField::Skills),
            Some(&["Underwater Welding".to_string()][..])
        );
    }

    #[test]
    fn test_max_websites_respected() {
        let config = ParsingConfigBuilder::new().max_websites(1).build().unwrap();
        let partial = FieldExtractor::with_config(config).extract_fields("a.com b.org c.net");
        assert_eq!(partial.list(CanonicalField::Websites).map(<[String]>::len), Some(1));
    }
}
