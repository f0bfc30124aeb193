use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use resume_core::CanonicalField;
use resume_core::text_utils::normalize_whitespace;

use crate::dictionaries::SECTION_HEADERS;

static HEADER_RES: Lazy<Vec<(Regex, CanonicalField)>> = Lazy::new(|| {
    SECTION_HEADERS
        .iter()
        .map(|(name, field)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(name).replace(' ', r"\s+"));
            (Regex::new(&pattern).unwrap(), *field)
        })
        .collect()
});

/// Scanner state: either before the first header or inside a named section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    NoSection,
    InSection(CanonicalField),
}

/// Lines grouped under the canonical section they appeared in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    /// Non-empty lines seen before the first header.
    pub preamble: Vec<String>,
    sections: BTreeMap<CanonicalField, Vec<String>>,
}

impl Sections {
    pub fn get(&self, field: CanonicalField) -> Option<&[String]> {
        self.sections.get(&field).map(Vec::as_slice)
    }

    /// Whether a header for this section was seen, even if no lines followed.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.sections.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &[String])> {
        self.sections.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// The canonical section a line announces, if any.
///
/// A line is a header when it contains a header phrase as whole words,
/// case-insensitively. Longer phrases are tried first.
pub fn detect_header(line: &str) -> Option<CanonicalField> {
    HEADER_RES
        .iter()
        .find(|(re, _)| re.is_match(line))
        .map(|(_, field)| *field)
}

/// Split text into canonical sections by scanning line by line.
///
/// A header line moves the scanner into that section and is not itself
/// recorded. Every other non-empty line is whitespace-normalized and
/// appended to the current section. A header repeated later, or a synonym
/// of one already seen, appends to the existing section.
pub fn segment_sections(text: &str) -> Sections {
    let mut out = Sections::default();
    let mut state = SectionState::NoSection;

    for raw in text.lines() {
        if let Some(field) = detect_header(raw) {
            state = SectionState::InSection(field);
            out.sections.entry(field).or_default();
            continue;
        }

        let line = normalize_whitespace(raw);
        if line.is_empty() {
            continue;
        }

        match state {
            SectionState::NoSection => out.preamble.push(line),
            SectionState::InSection(field) => out.sections.entry(field).or_default().push(line),
        }
    }

    out
}
