//! Result ordering
//!
//! Sorts matched document ids by one or more field keys, deterministically.
//! Ties keep ascending document id order.

use std::cmp::Ordering;

use serde_json::Value;

use crate::collection::{DocId, SnapshotReader};

/// Pseudo-field sorting by document id
pub const DOC_ID_FIELD: &str = "_docid_";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Sorts matched documents
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts `docs` by `specs` in priority order.
    ///
    /// Sort is stable; with no specs the ascending id order is kept.
    pub fn sort(reader: &dyn SnapshotReader, docs: &mut [DocId], specs: &[SortSpec]) {
        if specs.is_empty() {
            docs.sort_unstable();
            return;
        }
        docs.sort();

        docs.sort_by(|a, b| {
            for spec in specs {
                let ordering = if spec.field == DOC_ID_FIELD {
                    a.cmp(b)
                } else {
                    Self::compare_values(
                        Self::sort_value(reader, *a, &spec.field),
                        Self::sort_value(reader, *b, &spec.field),
                    )
                };
                let ordering = match spec.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// First scalar of the field; multi-valued fields sort by their first value
    fn sort_value<'r>(reader: &'r dyn SnapshotReader, doc: DocId, field: &str) -> Option<&'r Value> {
        match reader.document(doc)?.get(field)? {
            Value::Array(items) => items.first(),
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - missing < bool < number < string
    /// - For same types, natural ordering
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                    (Value::Number(a_n), Value::Number(b_n)) => {
                        let a_f = a_n.as_f64().unwrap_or(0.0);
                        let b_f = b_n.as_f64().unwrap_or(0.0);
                        a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                    _ => Ordering::Equal,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use serde_json::json;

    fn ids(reader: &dyn SnapshotReader, docs: &[DocId]) -> Vec<String> {
        docs.iter()
            .filter_map(|doc| reader.document(*doc))
            .map(|body| body["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn people() -> Collection {
        let collection = Collection::new("people");
        collection
            .add_all(vec![
                json!({"id": "c", "age": 30, "name": "charlie"}),
                json!({"id": "a", "age": 20, "name": "alice"}),
                json!({"id": "b", "age": 25, "name": "bob"}),
                json!({"id": "d", "name": "dave"}),
            ])
            .unwrap();
        collection
    }

    #[test]
    fn test_sort_ascending() {
        let snapshot = people().snapshot();
        let mut docs = vec![0, 1, 2, 3];
        ResultSorter::sort(&*snapshot, &mut docs, &[SortSpec::asc("age")]);
        assert_eq!(ids(&*snapshot, &docs), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let snapshot = people().snapshot();
        let mut docs = vec![0, 1, 2, 3];
        ResultSorter::sort(&*snapshot, &mut docs, &[SortSpec::desc("age")]);
        assert_eq!(ids(&*snapshot, &docs), vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_sort_by_string_id() {
        let snapshot = people().snapshot();
        let mut docs = vec![3, 2, 1, 0];
        ResultSorter::sort(&*snapshot, &mut docs, &[SortSpec::asc("id")]);
        assert_eq!(ids(&*snapshot, &docs), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_secondary_key_and_docid() {
        let collection = Collection::new("t");
        collection
            .add_all(vec![
                json!({"id": "x", "group": 1}),
                json!({"id": "y", "group": 0}),
                json!({"id": "z", "group": 1}),
            ])
            .unwrap();
        let snapshot = collection.snapshot();

        let mut docs = vec![0, 1, 2];
        ResultSorter::sort(
            &*snapshot,
            &mut docs,
            &[SortSpec::asc("group"), SortSpec::desc(DOC_ID_FIELD)],
        );
        assert_eq!(ids(&*snapshot, &docs), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_no_specs_keeps_id_order() {
        let snapshot = people().snapshot();
        let mut docs = vec![2, 0, 1];
        ResultSorter::sort(&*snapshot, &mut docs, &[]);
        assert_eq!(docs, vec![0, 1, 2]);
    }
}
