//! Integration tests for the result normalizer's output contract.
//!
//! Whatever shape a partial result arrives in, the serialized resume must
//! carry every canonical key with the right JSON type.

use resume_core::{CanonicalField, FieldKind, ParsedResume, PartialResume, normalize};
use serde_json::{Value, json};

fn assert_full_shape(value: &Value) {
    let obj = value.as_object().expect("resume serializes to an object");
    for field in CanonicalField::ALL {
        let v = obj
            .get(field.as_str())
            .unwrap_or_else(|| panic!("missing key {}", field.as_str()));
        match field.kind() {
            FieldKind::Scalar => assert!(v.is_string(), "{} should be a string: {v:?}", field),
            FieldKind::List => assert!(v.is_array(), "{} should be an array: {v:?}", field),
        }
    }
}

#[test]
fn empty_input_serializes_every_key() {
    let value = serde_json::to_value(normalize(PartialResume::new())).unwrap();
    assert_full_shape(&value);
    assert!(value.get("dynamic_fields").is_none());
    for key in ["name", "email", "phone", "summary"] {
        assert_eq!(value[key], "");
    }
    for key in ["skills", "experience", "education"] {
        assert_eq!(value[key], json!([]));
    }
}

#[test]
fn loose_json_is_coerced() {
    let stored = json!({
        "name": "  Jane Smith ",
        "email": null,
        "skills": ["Python", "python", null, "SQL"],
        "experience": "Engineer at Acme",
        "education": false,
        "years_of_experience": 7,
        "not_a_field": "ignored",
        "dynamic_fields": {"key_value_pairs": {"gpa": 3.8}}
    });
    let resume = normalize(PartialResume::from_json(&stored));
    assert_eq!(resume.name, "Jane Smith");
    assert_eq!(resume.email, "");
    assert_eq!(resume.skills, vec!["Python", "SQL"]);
    assert_eq!(resume.experience, vec!["Engineer at Acme"]);
    assert!(resume.education.is_empty());
    assert_eq!(resume.years_of_experience, "7");

    let dynamic = resume.dynamic_fields.as_ref().expect("dynamic fields kept");
    assert_eq!(dynamic.key_value_pairs["gpa"].as_f64(), Some(3.8));

    assert_full_shape(&serde_json::to_value(&resume).unwrap());
}

#[test]
fn normalize_is_idempotent_through_json() {
    let mut partial = PartialResume::new();
    partial.insert(CanonicalField::Name, "Jane Smith");
    partial.insert(
        CanonicalField::Timeline,
        vec!["Jan 2020 - Present".to_string(), "jan 2020 - present".to_string()],
    );
    let once = normalize(partial);
    assert_eq!(once.timeline, vec!["Jan 2020 - Present"]);

    let value = serde_json::to_value(&once).unwrap();
    let twice = normalize(PartialResume::from_json(&value));
    assert_eq!(once, twice);

    let round: ParsedResume = serde_json::from_value(value).unwrap();
    assert_eq!(round, once);
}
