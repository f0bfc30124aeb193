use std::cmp::Reverse;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use resume_parsing::standard_section_names;
use unicode_normalization::UnicodeNormalization;

/// Section keywords that get a blank line forced around them, in addition
/// to every multi-word section header.
pub const SECTION_KEYWORDS: &[&str] = &[
    "professional experience",
    "professional summary",
    "work experience",
    "work history",
    "education",
    "experience",
    "skills",
    "projects",
    "certifications",
    "achievements",
    "summary",
    "objective",
];

static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
static LINE_EDGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?\n ?").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])([A-Z])").unwrap());
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    // Every multi-word header the section scanner knows is matched whole, so
    // "Volunteer Experience" is not split before its last word.
    let mut seen = HashSet::new();
    let mut phrases: Vec<&str> = SECTION_KEYWORDS
        .iter()
        .copied()
        .chain(standard_section_names().filter(|name| name.contains(' ')))
        .filter(|p| seen.insert(p.to_lowercase()))
        .collect();
    phrases.sort_by_key(|p| Reverse(p.len()));

    let alternation = phrases
        .iter()
        .map(|k| regex::escape(k).replace(' ', r"[^\S\n]+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).unwrap()
});

/// Normalize raw backend output into the text the field rules run on.
///
/// Steps, in order: NFKC folding (ligatures, full-width forms), line ending
/// normalization, horizontal whitespace collapsed to one space, a space
/// inserted after `.`/`!`/`?` directly followed by a capital letter, a blank
/// line forced before and after every section keyword, and runs of three or
/// more newlines collapsed to one blank line.
///
/// Line breaks are kept: section segmentation and header detection work
/// line by line.
pub fn clean_text(raw: &str) -> String {
    let text: String = raw.nfkc().collect();
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HSPACE_RE.replace_all(&text, " ");
    let text = SENTENCE_RE.replace_all(&text, "${1} ${2}");
    let text = KEYWORD_RE.replace_all(&text, "\n\n${1}\n\n");
    let text = LINE_EDGE_RE.replace_all(&text, "\n");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(clean_text("Jane    Smith\t\tDeveloper"), "Jane Smith Developer");
    }

    #[test]
    fn test_normalizes_line_endings() {
        assert_eq!(clean_text("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_collapses_blank_runs() {
        assert_eq!(clean_text("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_space_after_sentence_end() {
        assert_eq!(clean_text("Led a team.Shipped v2!Done"), "Led a team. Shipped v2! Done");
    }

    #[test]
    fn test_emails_and_decimals_untouched() {
        let cleaned = clean_text("jane.smith@email.com GPA 3.8 example.com");
        assert_eq!(cleaned, "jane.smith@email.com GPA 3.8 example.com");
    }

    #[test]
    fn test_ligatures_folded() {
        assert_eq!(clean_text("e\u{FB03}cient o\u{FB01}ce"), "efficient office");
    }

    #[test]
    fn test_section_keyword_gets_blank_lines() {
        let cleaned = clean_text("Jane Smith EDUCATION MIT, BS SKILLS Python");
        assert_eq!(cleaned, "Jane Smith\n\nEDUCATION\n\nMIT, BS\n\nSKILLS\n\nPython");
    }

    #[test]
    fn test_multi_word_keyword_kept_whole() {
        let cleaned = clean_text("Work Experience Acme Corp");
        assert_eq!(cleaned, "Work Experience\n\nAcme Corp");
    }

    #[test]
    fn test_scanner_headers_kept_whole() {
        let cleaned = clean_text("Acme Corp VOLUNTEER EXPERIENCE Food bank TECHNICAL SKILLS Python");
        assert_eq!(
            cleaned,
            "Acme Corp\n\nVOLUNTEER EXPERIENCE\n\nFood bank\n\nTECHNICAL SKILLS\n\nPython"
        );
    }

    #[test]
    fn test_keyword_inside_word_untouched() {
        assert_eq!(clean_text("skillset summarize"), "skillset summarize");
    }

    #[test]
    fn test_already_separated_header_stable() {
        let text = "Jane Smith\n\nSKILLS\n\nPython, Docker";
        assert_eq!(clean_text(text), text);
        assert_eq!(clean_text(&clean_text(text)), text);
    }

    #[test]
    fn test_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("  \n\n \t "), "");
    }
}
