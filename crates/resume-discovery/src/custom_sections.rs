use std::collections::BTreeMap;

use resume_parsing::standard_section_names;

use crate::DiscoveryError;

/// Lowercase words allowed inside an otherwise title-cased header.
const CONNECTORS: &[&str] = &["and", "of", "the", "for", "in", "&", "/", "-", "to", "on"];

const MAX_HEADER_WORDS: usize = 6;

/// Title case, at most a few words, no trailing punctuation except `:`.
fn is_header_candidate(line: &str) -> bool {
    let line = line.trim();
    let Some(last) = line.chars().last() else {
        return false;
    };
    if !(last.is_alphanumeric() || last == ':') || line.contains(',') || line.contains('@') {
        return false;
    }
    let words: Vec<&str> = line.trim_end_matches(':').split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_HEADER_WORDS {
        return false;
    }

    let mut cased_words = 0;
    for word in &words {
        if CONNECTORS.contains(word) {
            continue;
        }
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if !first.is_uppercase() {
            return false;
        }
        if !chars.all(|c| c.is_lowercase() || c == '\'' || c == '-') {
            return false;
        }
        cased_words += 1;
    }
    cased_words > 0
}

/// Whether a header names one of the standard sections: substring either
/// way, or a fuzzy ratio above `threshold`.
pub fn is_standard_section(header: &str, threshold: f64) -> bool {
    let header = header.trim().trim_end_matches(':').to_lowercase();
    standard_section_names().any(|standard| {
        header.contains(standard)
            || standard.contains(header.as_str())
            || rapidfuzz::fuzz::ratio(header.chars(), standard.chars()) > threshold
    })
}

/// Find title-case headers that are not standard sections and collect the
/// lines under each until the next header of either kind.
///
/// A header must open a block (follow a blank line) or end with `:`, so
/// single-word content lines such as "Python" are not taken for headers.
/// The first non-empty line is skipped; it is almost always the name.
pub fn find_custom_sections(
    text: &str,
    threshold: f64,
) -> Result<BTreeMap<String, Vec<String>>, DiscoveryError> {
    let mut sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut seen_first = false;
    let mut after_blank = true;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            after_blank = true;
            continue;
        }
        let opens_block = after_blank;
        after_blank = false;
        if !seen_first {
            seen_first = true;
            continue;
        }

        if (opens_block || line.ends_with(':')) && is_header_candidate(line) {
            if is_standard_section(line, threshold) {
                current = None;
            } else {
                let name = line.trim_end_matches(':').trim().to_string();
                sections.entry(name.clone()).or_default();
                current = Some(name);
            }
            continue;
        }
        if let Some(lines) = current.as_ref().and_then(|name| sections.get_mut(name)) {
            lines.push(line.to_string());
        }
    }

    sections.retain(|_, lines| !lines.is_empty());
    Ok(sections)
}
