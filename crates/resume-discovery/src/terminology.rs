use std::collections::HashMap;

use resume_core::text_utils::is_stopword;
use resume_parsing::tagger::{self, PosTag};

use crate::DiscoveryError;

const MAX_TERMS: usize = 20;
const MAX_ADJECTIVES: usize = 2;

fn content_tokens(line: &str) -> Vec<&str> {
    tagger::tokenize(line)
        .into_iter()
        .filter(|t| t.chars().next().is_some_and(char::is_alphabetic))
        .filter(|t| t.chars().count() > 1 && !is_stopword(t))
        .collect()
}

/// Noun phrases (a noun with up to two adjectives before it) plus every
/// bigram and trigram of content words, lowercased.
fn candidate_terms(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for line in text.lines() {
        let tokens = content_tokens(line);
        if tokens.is_empty() {
            continue;
        }
        let tagged = tagger::pos_tag(&tokens);

        for (i, token) in tagged.iter().enumerate() {
            if !token.tag.is_noun() {
                continue;
            }
            let mut start = i;
            while start > 0 && i - start < MAX_ADJECTIVES && tagged[start - 1].tag == PosTag::Adjective {
                start -= 1;
            }
            let phrase = tagged[start..=i]
                .iter()
                .map(|t| t.text.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            terms.push(phrase);
        }

        for n in [2, 3] {
            for window in tokens.windows(n) {
                terms.push(
                    window
                        .iter()
                        .map(|t| t.to_lowercase())
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }
        }
    }
    terms
}

/// Whether two terms are near duplicates: one contains the other, or their
/// fuzzy ratio exceeds `threshold`.
pub fn near_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    a.contains(b) || b.contains(a) || rapidfuzz::fuzz::ratio(a.chars(), b.chars()) > threshold
}

/// Repeated domain vocabulary: candidate terms that occur more than once,
/// near duplicates collapsed in favor of the longer term, longest first,
/// at most 20.
pub fn extract_terminology(text: &str, threshold: f64) -> Result<Vec<String>, DiscoveryError> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for term in candidate_terms(text) {
        *counts.entry(term).or_default() += 1;
    }

    let mut repeated: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(term, _)| term)
        .collect();
    repeated.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));

    let mut kept: Vec<String> = Vec::new();
    for term in repeated {
        if kept.iter().any(|k| near_duplicate(k, &term, threshold)) {
            continue;
        }
        kept.push(term);
        if kept.len() == MAX_TERMS {
            break;
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_phrases_kept() {
        let text = "Designed distributed systems for payments.\n\
                    Scaled distributed systems to millions of users.\n\
                    Wrote one blog post.";
        let terms = extract_terminology(text, 0.8).unwrap();
        assert!(terms.contains(&"distributed systems".to_string()), "{:?}", terms);
        assert!(!terms.iter().any(|t| t.contains("blog")), "{:?}", terms);
    }

    #[test]
    fn test_near_duplicates_prefer_longer() {
        let text = "machine learning pipelines\nmachine learning pipelines\nmachine learning\nmachine learning";
        let terms = extract_terminology(text, 0.8).unwrap();
        assert_eq!(terms.first().map(String::as_str), Some("machine learning pipelines"));
        assert!(!terms.contains(&"machine learning".to_string()), "{:?}", terms);
    }

    #[test]
    fn test_sorted_by_length_and_capped() {
        let mut text = String::new();
        for i in 0..30 {
            let line = format!("alpha{i} beta{i} gamma{i}\n");
            text.push_str(&line);
            text.push_str(&line);
        }
        let terms = extract_terminology(&text, 0.8).unwrap();
        assert!(terms.len() <= MAX_TERMS);
        for pair in terms.windows(2) {
            assert!(pair[0].chars().count() >= pair[1].chars().count(), "{:?}", terms);
        }
    }

    #[test]
    fn test_short_text_has_no_repeats() {
        assert!(extract_terminology("One line only.", 0.8).unwrap().is_empty());
    }
}
