use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use resume_core::KeyValue;
use resume_core::text_utils::is_stopword;

use crate::DiscoveryError;

static COLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z /&()'.-]*?)\s*:\s*(.*?)\s*$").unwrap());

static DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z /&()'.]*?)\s+[-–]\s+(.*?)\s*$").unwrap());

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap());

const MAX_KEY_CHARS: usize = 30;

/// Keys whose values are coerced to numbers when they contain one.
const NUMERIC_KEYS: &[&str] = &["age", "years", "salary", "gpa", "score"];

fn is_numeric_key(key: &str) -> bool {
    key.split_whitespace().any(|w| NUMERIC_KEYS.contains(&w))
}

fn parse_number(value: &str) -> Option<f64> {
    let m = NUMBER_RE.find(value)?;
    m.as_str().replace(',', "").parse().ok()
}

fn split_pair(line: &str) -> Option<(String, String)> {
    let caps = COLON_RE.captures(line).or_else(|| DASH_RE.captures(line))?;
    let key = caps[1].trim().to_lowercase();
    let value = caps[2].trim().to_string();
    Some((key, value))
}

fn acceptable(key: &str, value: &str) -> bool {
    !key.is_empty()
        && key.chars().count() <= MAX_KEY_CHARS
        && !value.is_empty()
        && !value.starts_with("//")
        && !key.split_whitespace().all(is_stopword)
}

/// `Key: Value` or `Key - Value` pairs, one per line, keys lowercased.
///
/// Keys that are only stopwords, longer than 30 characters, or have empty
/// values are rejected. Values of numeric keys (age, years, salary, gpa,
/// score) become numbers when they contain one. The first occurrence of a
/// key wins.
pub fn extract_key_values(text: &str) -> Result<BTreeMap<String, KeyValue>, DiscoveryError> {
    let mut pairs = BTreeMap::new();
    for line in text.lines() {
        let Some((key, value)) = split_pair(line) else {
            continue;
        };
        if !acceptable(&key, &value) {
            continue;
        }
        let parsed = if is_numeric_key(&key) {
            parse_number(&value).map_or(KeyValue::Text(value), KeyValue::Number)
        } else {
            KeyValue::Text(value)
        };
        pairs.entry(key).or_insert(parsed);
    }
    Ok(pairs)
}
