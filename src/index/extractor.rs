//! Value extraction from stored documents
//!
//! Missing fields and missing documents are not errors: they yield no values.
//! Multi-valued fields (JSON arrays) yield every scalar element in stored
//! order; `null` and nested containers are skipped.

use serde_json::Value;

use crate::collection::{DocId, SnapshotReader};

use super::value::FieldValue;

/// Reads field values out of documents
pub struct ValueExtractor;

impl ValueExtractor {
    /// Values of `field` for one document of a snapshot
    pub fn values(reader: &dyn SnapshotReader, doc: DocId, field: &str) -> Vec<FieldValue> {
        match reader.document(doc) {
            Some(body) => Self::from_body(body, field),
            None => Vec::new(),
        }
    }

    /// Values of `field` in a document body
    pub fn from_body(body: &Value, field: &str) -> Vec<FieldValue> {
        match body.get(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().filter_map(FieldValue::from_json).collect(),
            Some(value) => FieldValue::from_json(value).into_iter().collect(),
        }
    }

    /// Returns true if the document holds at least one value for `field`
    pub fn has_values(body: &Value, field: &str) -> bool {
        match body.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::Array(items)) => items.iter().any(|v| FieldValue::from_json(v).is_some()),
            Some(value) => FieldValue::from_json(value).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use serde_json::json;

    #[test]
    fn test_single_value() {
        let body = json!({"dept_s": "Sales"});
        assert_eq!(
            ValueExtractor::from_body(&body, "dept_s"),
            vec![FieldValue::from_string("Sales")]
        );
    }

    #[test]
    fn test_multi_value_keeps_stored_order() {
        let body = json!({"dept_s": ["Support", "Engineering"]});
        assert_eq!(
            ValueExtractor::from_body(&body, "dept_s"),
            vec![
                FieldValue::from_string("Support"),
                FieldValue::from_string("Engineering")
            ]
        );
    }

    #[test]
    fn test_missing_and_null_are_empty() {
        let body = json!({"a": null, "b": [], "c": [null, {"x": 1}]});
        assert!(ValueExtractor::from_body(&body, "a").is_empty());
        assert!(ValueExtractor::from_body(&body, "b").is_empty());
        assert!(ValueExtractor::from_body(&body, "c").is_empty());
        assert!(ValueExtractor::from_body(&body, "nope").is_empty());
        assert!(!ValueExtractor::has_values(&body, "c"));
    }

    #[test]
    fn test_values_from_snapshot() {
        let collection = Collection::new("c");
        collection
            .add(json!({"id": "1", "small_is": [3, 4]}))
            .unwrap();
        let snap = collection.snapshot();

        assert_eq!(
            ValueExtractor::values(&*snap, 0, "small_is"),
            vec![FieldValue::from_int(3), FieldValue::from_int(4)]
        );
        // out of range document
        assert!(ValueExtractor::values(&*snap, 99, "small_is").is_empty());
    }
}
