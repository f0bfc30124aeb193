//! Result normalization: turns a [`PartialResume`] into a [`ParsedResume`]
//! with every canonical key present and list fields deduplicated.

use crate::text_utils::dedup_case_insensitive;
use crate::{CanonicalField, FieldKind, FieldValue, ParsedResume, PartialResume};

/// Fill defaults, coerce shapes and deduplicate lists.
///
/// - Scalars default to `""`; a list received for a scalar field is joined
///   with single spaces.
/// - Lists default to `[]`; a non-empty scalar received for a list field
///   becomes a one-element list.
/// - List entries are trimmed, empties dropped, and duplicates removed
///   case-insensitively keeping the first-seen casing and order.
pub fn normalize(partial: PartialResume) -> ParsedResume {
    let (fields, dynamic_fields) = partial.into_parts();
    let mut resume = ParsedResume::default();

    for (field, value) in fields {
        match field.kind() {
            FieldKind::Scalar => {
                if let Some(slot) = resume.scalar_mut(field) {
                    *slot = scalar_value(value);
                }
            }
            FieldKind::List => {
                if let Some(slot) = resume.list_mut(field) {
                    *slot = list_value(value);
                }
            }
        }
    }

    resume.dynamic_fields = dynamic_fields.filter(|d| !d.is_empty());
    resume
}

fn scalar_value(value: FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.trim().to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn list_value(value: FieldValue) -> Vec<String> {
    let items = match value {
        FieldValue::Text(s) => vec![s],
        FieldValue::List(items) => items,
    };
    dedup_case_insensitive(
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    )
}

/// Names of every key a serialized [`ParsedResume`] carries, in canonical order.
pub fn canonical_keys() -> impl Iterator<Item = &'static str> {
    CanonicalField::ALL.iter().map(|f| f.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DynamicFields, KeyValue};

    #[test]
    fn test_empty_partial_has_every_key() {
        let resume = normalize(PartialResume::new());
        let value = serde_json::to_value(&resume).unwrap();
        let obj = value.as_object().unwrap();
        for key in canonical_keys() {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), CanonicalField::ALL.len());
        assert_eq!(resume.name, "");
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_list_dedup_keeps_first_casing() {
        let mut partial = PartialResume::new();
        partial.insert(
            CanonicalField::Skills,
            vec![
                "Python".to_string(),
                "python".to_string(),
                "AWS".to_string(),
                "PYTHON".to_string(),
                "aws".to_string(),
            ],
        );
        let resume = normalize(partial);
        assert_eq!(resume.skills, vec!["Python", "AWS"]);
    }

    #[test]
    fn test_scalar_coerced_to_list() {
        let mut partial = PartialResume::new();
        partial.insert(CanonicalField::Education, "MIT, BS Computer Science");
        partial.insert(CanonicalField::Experience, "   ");
        let resume = normalize(partial);
        assert_eq!(resume.education, vec!["MIT, BS Computer Science"]);
        assert!(resume.experience.is_empty());
    }

    #[test]
    fn test_list_coerced_to_scalar() {
        let mut partial = PartialResume::new();
        partial.insert(
            CanonicalField::Summary,
            vec!["Backend engineer.".to_string(), "Loves Rust.".to_string()],
        );
        let resume = normalize(partial);
        assert_eq!(resume.summary, "Backend engineer. Loves Rust.");
    }

    #[test]
    fn test_empty_dynamic_fields_dropped() {
        let mut partial = PartialResume::new();
        partial.dynamic_fields = Some(DynamicFields::default());
        assert!(normalize(partial).dynamic_fields.is_none());

        let mut partial = PartialResume::new();
        let mut dynamic = DynamicFields::default();
        dynamic
            .key_value_pairs
            .insert("age".to_string(), KeyValue::Number(31.0));
        partial.dynamic_fields = Some(dynamic);
        assert!(normalize(partial).dynamic_fields.is_some());
    }
}
