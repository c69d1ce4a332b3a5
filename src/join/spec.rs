//! Static join definition

use crate::query::{QueryError, QueryResult, Query};

/// One `{!join ...}` clause after parsing
///
/// Immutable once built. A missing from-collection means the join runs
/// against the outer query's own collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    from_field: String,
    to_field: String,
    from_collection: Option<String>,
    sub_query: Query,
}

impl JoinSpec {
    /// Validates and builds a join definition.
    ///
    /// Both field names must be non-empty.
    pub fn new(
        from_field: impl Into<String>,
        to_field: impl Into<String>,
        from_collection: Option<String>,
        sub_query: Query,
    ) -> QueryResult<Self> {
        let from_field = from_field.into();
        let to_field = to_field.into();

        if from_field.trim().is_empty() {
            return Err(QueryError::configuration("from", "field name is empty"));
        }
        if to_field.trim().is_empty() {
            return Err(QueryError::configuration("to", "field name is empty"));
        }

        Ok(Self {
            from_field,
            to_field,
            from_collection,
            sub_query,
        })
    }

    pub fn from_field(&self) -> &str {
        &self.from_field
    }

    pub fn to_field(&self) -> &str {
        &self.to_field
    }

    /// Collection the sub-query runs against, if not the outer one
    pub fn from_collection(&self) -> Option<&str> {
        self.from_collection.as_deref()
    }

    pub fn sub_query(&self) -> &Query {
        &self.sub_query
    }

    /// Stable text form used to key diagnostics
    pub fn signature(&self) -> String {
        let mut out = format!("{{!join from={} to={}", self.from_field, self.to_field);
        if let Some(collection) = &self.from_collection {
            out.push_str(" fromIndex=");
            out.push_str(collection);
        }
        out.push('}');
        out.push_str(&self.sub_query.to_string());
        out
    }
}
