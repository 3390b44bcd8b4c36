//! Corruption and version-mismatch handling: fail loudly, never mis-parse.

use crate::common::body_index;
use staticseek::{create_index_from_object, index_to_object, SchemaError, FORMAT_VERSION};

fn portable() -> staticseek::PortableIndex {
    index_to_object(&body_index(&["the quick brown fox", "a lazy dog"]))
}

#[test]
fn future_version_is_rejected_not_guessed() {
    let mut p = portable();
    p.version = FORMAT_VERSION + 1;
    assert_eq!(
        create_index_from_object(p).unwrap_err(),
        SchemaError::UnsupportedVersion {
            found: FORMAT_VERSION + 1,
            supported: FORMAT_VERSION,
        }
    );
}

#[test]
fn version_zero_is_rejected() {
    let mut p = portable();
    p.version = 0;
    assert!(matches!(
        create_index_from_object(p).unwrap_err(),
        SchemaError::UnsupportedVersion { found: 0, .. }
    ));
}

#[test]
fn bit_flips_fail_the_checksum() {
    let mut p = portable();
    if let Some(first) = p.positions.first_mut() {
        *first ^= 1;
    }
    assert!(matches!(
        create_index_from_object(p).unwrap_err(),
        SchemaError::ChecksumMismatch { .. }
    ));
}

#[test]
fn truncated_posting_arrays_are_rejected() {
    let mut p = portable();
    p.posting_doc_ids.pop();
    p.posting_fields.pop();
    assert!(create_index_from_object(p).is_err());
}

#[test]
fn missing_required_json_fields_fail_deserialization() {
    let mut value = serde_json::to_value(portable()).unwrap();
    value.as_object_mut().unwrap().remove("postingOffsets");
    assert!(serde_json::from_value::<staticseek::PortableIndex>(value).is_err());
}

#[test]
fn wrong_json_types_fail_deserialization() {
    let mut value = serde_json::to_value(portable()).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("positions".to_string(), serde_json::json!("not an array"));
    assert!(serde_json::from_value::<staticseek::PortableIndex>(value).is_err());
}

#[test]
fn negative_frequencies_cannot_be_represented() {
    // Positions and counts are unsigned in the schema; a negative value in
    // the JSON must fail at the type level, not be reinterpreted.
    let mut value = serde_json::to_value(portable()).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("positions".to_string(), serde_json::json!([-1]));
    assert!(serde_json::from_value::<staticseek::PortableIndex>(value).is_err());
}

#[test]
fn garbage_json_fails_cleanly() {
    assert!(serde_json::from_str::<staticseek::PortableIndex>("{}").is_err());
    assert!(serde_json::from_str::<staticseek::PortableIndex>("[1,2,3]").is_err());
    assert!(serde_json::from_str::<staticseek::PortableIndex>("").is_err());
}
