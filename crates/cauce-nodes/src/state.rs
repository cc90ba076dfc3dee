//! Tolerant JSON state blobs.
//!
//! Node state restores field by field: a blob that fails to parse, or
//! parses but carries a garbled field, loses only the affected fields.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parses a blob, yielding `Null` for anything unparseable.
pub(crate) fn parse(blob: &str) -> Value {
    serde_json::from_str(blob).unwrap_or(Value::Null)
}

/// Extracts one typed field, or `None` if absent or the wrong shape.
pub(crate) fn field<T: DeserializeOwned>(state: &Value, key: &str) -> Option<T> {
    state
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_blob_parses_to_null() {
        assert_eq!(parse("{not json"), Value::Null);
        assert_eq!(parse(""), Value::Null);
    }

    #[test]
    fn garbled_field_is_skipped_not_fatal() {
        let state = parse(r#"{"next": "oops", "step": 3}"#);
        assert_eq!(field::<i64>(&state, "next"), None);
        assert_eq!(field::<i64>(&state, "step"), Some(3));
        assert_eq!(field::<i64>(&state, "missing"), None);
    }
}
