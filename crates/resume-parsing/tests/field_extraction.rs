//! End-to-end field extraction over cleaned resume text, followed by
//! normalization, the way the pipeline runs it.

use resume_core::{CanonicalField, ParsedResume, normalize};
use resume_parsing::{FieldExtractor, ParsingConfigBuilder, extract_fields};

fn parse(text: &str) -> ParsedResume {
    normalize(extract_fields(text))
}

const JANE: &str = "Jane Smith\njane.smith@email.com\n(555) 123-4567\n\nEDUCATION\nMIT, BS Computer Science\n\nSKILLS\nPython, Docker, AWS";

// =============================================================================
// Contact block and sections
// =============================================================================

#[test]
fn contact_block_and_sections() {
    let resume = parse(JANE);
    assert_eq!(resume.name, "Jane Smith");
    assert_eq!(resume.email, "jane.smith@email.com");
    assert_eq!(resume.phone, "(555) 123-4567");
    for skill in ["Python", "Docker", "AWS"] {
        assert!(
            resume.skills.iter().any(|s| s == skill),
            "missing {skill} in {:?}",
            resume.skills
        );
    }
    assert!(
        resume.education.iter().any(|line| line.contains("MIT")),
        "education: {:?}",
        resume.education
    );
    assert!(resume.location.is_empty(), "location: {:?}", resume.location);
}

#[test]
fn empty_input_gives_empty_resume() {
    let resume = parse("");
    for field in CanonicalField::ALL {
        if let Some(s) = resume.scalar(field) {
            assert_eq!(s, "", "{field} should be empty");
        }
        if let Some(list) = resume.list(field) {
            assert!(list.is_empty(), "{field} should be empty");
        }
    }
    assert!(resume.dynamic_fields.is_none());
}

// =============================================================================
// Determinism and dictionary behavior
// =============================================================================

#[test]
fn extraction_is_idempotent() {
    let extractor = FieldExtractor::new();
    let text = format!("{JANE}\n\nEXPERIENCE\nSenior Software Engineer, Acme Corp\nJan 2020 - Present");
    let first = extractor.extract_fields(&text);
    let second = extractor.extract_fields(&text);
    assert_eq!(first, second);
}

#[test]
fn skills_are_case_insensitive_and_bounded() {
    let resume = parse("PYTHON\n\npython developer");
    assert_eq!(resume.skills, vec!["Python"]);
}

#[test]
fn industries_and_titles() {
    let text = "Alex Doe\nSenior Data Scientist\n8 years of experience in Healthcare and Insurance";
    let resume = parse(text);
    assert_eq!(resume.industry, vec!["Healthcare", "Insurance"]);
    assert_eq!(resume.job_titles, vec!["Senior Data Scientist"]);
    assert_eq!(resume.years_of_experience, "8");
}

#[test]
fn location_accepts_any_region_unless_restricted() {
    let text = "Mia Chen\nSydney, AU\nSenior Backend Engineer";
    assert_eq!(parse(text).location, "Sydney, AU");

    let config = ParsingConfigBuilder::new().known_regions_only().build().unwrap();
    let restricted = normalize(FieldExtractor::with_config(config).extract_fields(text));
    assert!(restricted.location.is_empty(), "location: {:?}", restricted.location);
}

// =============================================================================
// Section synonyms
// =============================================================================

/// When both "profile" and "summary" appear, both feed the summary in
/// document order.
#[test]
fn profile_and_summary_both_feed_summary() {
    let text = "Jane Smith\n\nPROFILE\nBackend engineer.\n\nEXPERIENCE\nAcme Corp\n\nSUMMARY\nLoves Rust.";
    let resume = parse(text);
    assert_eq!(resume.summary, "Backend engineer. Loves Rust.");
    assert_eq!(resume.experience, vec!["Acme Corp"]);
}

#[test]
fn work_history_synonyms_merge_into_experience() {
    let text = "WORK EXPERIENCE\nAcme Corp\n\nEMPLOYMENT\nGlobex Inc";
    let resume = parse(text);
    assert_eq!(resume.experience, vec!["Acme Corp", "Globex Inc"]);
}

#[test]
fn timeline_keeps_every_range() {
    let text = "EXPERIENCE\nAcme Corp Jan 2020 - Present\nGlobex Mar 2018 - Dec 2019";
    let resume = parse(text);
    assert_eq!(resume.timeline, vec!["Jan 2020 - Present", "Mar 2018 - Dec 2019"]);
}
