//! Individual field rules. Each rule is independent of the others and
//! returns `Ok(None)` or an empty list when nothing matches.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use resume_core::CanonicalField;
use resume_core::text_utils::dedup_case_insensitive;

use crate::FieldError;
use crate::dictionaries::DictionaryMatcher;
use crate::tagger::{self, EntityKind};

pub(crate) static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

pub(crate) static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,2}\s)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap()
});

/// Name at the very start of the text: two or more capitalized words on the
/// first line.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-z]+(?:[^\S\n]+[A-Z][a-z]+)+)").unwrap());

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)linkedin\.com/(?:in/|pub/|profile/view\?id=)([A-Za-z0-9_%-]+)").unwrap()
});

/// A whole token that looks like a host name or URL. TLDs are lowercase so
/// that `ASP.NET` or `Vue.js` are not taken for domains.
static WEBSITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?[A-Za-z0-9][A-Za-z0-9-]*(?:\.[A-Za-z0-9-]+)*\.(?:com|org|net|io|dev|ai|co|me|app|edu|gov|info|tech|xyz|us|uk|ca|de|site|page)(?:/\S*)?$",
    )
    .unwrap()
});

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:[ ][A-Z][a-z]+)*),[ ]?([A-Z]{2})\b").unwrap()
});

static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*years?\s*(?:of\s*)?experience").unwrap()
});

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?";

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH}\s+\d{{4}}\s*(?:-|–|—|to)\s*(?:{MONTH}\s+\d{{4}}|Present|Current|Now)\b"
    ))
    .unwrap()
});

const MAX_TITLE_PREFIX: usize = 3;
const MAX_TITLE_SUFFIX: usize = 2;

/// Title keywords that also read as imperative verbs ("Lead the migration").
/// At the start of a line they only count when a capitalized word follows.
const VERB_LIKE_KEYWORDS: &[&str] = &["lead", "head", "partner"];

/// Name from the leading capitalized words, falling back to the first
/// PERSON chunk of the first paragraph.
pub fn extract_name(text: &str) -> Result<Option<String>, FieldError> {
    let trimmed = text.trim();
    if let Some(caps) = NAME_RE.captures(trimmed) {
        return Ok(Some(caps[1].trim().to_string()));
    }

    let first_paragraph = trimmed.split("\n\n").next().unwrap_or_default();
    Ok(tagger::entities(first_paragraph)
        .into_iter()
        .find(|chunk| chunk.kind == EntityKind::Person)
        .map(|chunk| chunk.text))
}

pub fn extract_email(text: &str, re: Option<&Regex>) -> Result<Option<String>, FieldError> {
    let re = re.unwrap_or(&EMAIL_RE);
    Ok(re.find(text).map(|m| m.as_str().to_string()))
}

pub fn extract_phone(text: &str, re: Option<&Regex>) -> Result<Option<String>, FieldError> {
    let re = re.unwrap_or(&PHONE_RE);
    Ok(re.find(text).map(|m| m.as_str().trim().to_string()))
}

/// LinkedIn profile link normalized to `linkedin.com/in/<handle>`.
pub fn extract_linkedin(text: &str) -> Result<Option<String>, FieldError> {
    Ok(LINKEDIN_RE
        .captures(text)
        .map(|caps| format!("linkedin.com/in/{}", &caps[1])))
}

/// Up to `max` domain-like tokens in document order, skipping email
/// addresses and LinkedIn links.
pub fn extract_websites(text: &str, max: usize) -> Result<Vec<String>, FieldError> {
    let mut sites = Vec::new();
    let mut seen = HashSet::new();
    for raw in text.split_whitespace() {
        if sites.len() >= max {
            break;
        }
        let token = raw
            .trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')' | '<' | '>' | '"' | '\'' | '|' | '[' | ']'))
            .trim_end_matches(['.', ':']);
        if token.contains('@') || token.to_lowercase().contains("linkedin.com") {
            continue;
        }
        if WEBSITE_RE.is_match(token) && seen.insert(token.to_lowercase()) {
            sites.push(token.to_string());
        }
    }
    Ok(sites)
}

/// First `City, ST` pair. With `regions` set, the two-letter code must be
/// one of them.
pub fn extract_location(
    text: &str,
    regions: Option<&HashSet<String>>,
) -> Result<Option<String>, FieldError> {
    Ok(LOCATION_RE
        .captures_iter(text)
        .find(|caps| regions.is_none_or(|r| r.contains(&caps[2])))
        .map(|caps| format!("{}, {}", &caps[1], &caps[2])))
}

pub fn extract_years_of_experience(text: &str) -> Result<Option<String>, FieldError> {
    let Some(caps) = YEARS_RE.captures(text) else {
        return Ok(None);
    };
    let digits = &caps[1];
    let years: u32 = digits.parse().map_err(|e: std::num::ParseIntError| FieldError::InvalidValue {
        field: CanonicalField::YearsOfExperience,
        value: digits.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(years.to_string()))
}

pub fn extract_dictionary_terms(text: &str, matcher: &DictionaryMatcher) -> Result<Vec<String>, FieldError> {
    Ok(matcher.find_all(text))
}

/// Every month-year range, including open-ended ones, in document order.
pub fn extract_timeline(text: &str) -> Result<Vec<String>, FieldError> {
    Ok(DATE_RANGE_RE
        .find_iter(text)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect())
}

fn strip_token(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '.' | '(' | ')' | '|' | '"'))
}

fn is_title_word(token: &str) -> bool {
    let word = strip_token(token);
    word.chars().next().is_some_and(|c| c.is_uppercase())
        && word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '&' || c == '/')
}

/// Nothing but bullets or dashes before this point on the line.
fn starts_line(before: &[&str]) -> bool {
    before
        .iter()
        .all(|t| !t.chars().any(|c| c.is_alphanumeric()))
}

fn ends_clause(token: &str) -> bool {
    token.ends_with([',', ';', ':', '.', '|', ')'])
}

/// Job titles around title keywords, extended greedily over adjacent
/// capitalized words on the same line ("Senior Software Engineer").
pub fn extract_job_titles(text: &str, keywords: &HashSet<String>) -> Result<Vec<String>, FieldError> {
    let mut titles = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        for (i, token) in tokens.iter().enumerate() {
            let word = strip_token(token);
            let lower = word.to_lowercase();
            if !is_title_word(token) || !keywords.contains(&lower) {
                continue;
            }
            if VERB_LIKE_KEYWORDS.contains(&lower.as_str())
                && starts_line(&tokens[..i])
                && (ends_clause(token) || !tokens.get(i + 1).is_some_and(|t| is_title_word(t)))
            {
                continue;
            }

            let mut start = i;
            while start > 0
                && i - start < MAX_TITLE_PREFIX
                && is_title_word(tokens[start - 1])
                && !ends_clause(tokens[start - 1])
                && !tokens[start - 1].starts_with('(')
            {
                start -= 1;
            }

            let mut end = i;
            while end + 1 < tokens.len()
                && end - i < MAX_TITLE_SUFFIX
                && !ends_clause(tokens[end])
                && is_title_word(tokens[end + 1])
            {
                end += 1;
            }

            let title = tokens[start..=end]
                .iter()
                .map(|t| strip_token(t))
                .collect::<Vec<_>>()
                .join(" ");
            titles.push(title);
        }
    }
    Ok(dedup_case_insensitive(titles))
}
