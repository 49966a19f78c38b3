//! Media plan document helpers
//!
//! A media plan document is an arbitrary nested mapping owned by the
//! caller. The declared schema version lives at the fixed path
//! `meta.schema_version`.

use serde_json::{Map, Value};

use crate::version::SchemaVersion;

/// Read the embedded schema version, if any.
pub fn schema_version(document: &Value) -> Option<&str> {
    document.get("meta")?.get("schema_version")?.as_str()
}

/// Return a copy of `document` with `meta.schema_version` set to `version`.
///
/// The input is never modified; a missing `meta` section is created. A
/// non-object root or `meta` is returned as-is for the validator to flag.
pub fn with_schema_version(document: &Value, version: SchemaVersion) -> Value {
    let mut result = document.clone();
    if let Value::Object(root) = &mut result {
        let meta = root
            .entry("meta")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(meta) = meta {
            meta.insert(
                "schema_version".to_string(),
                Value::String(version.to_string()),
            );
        }
    }
    result
}
