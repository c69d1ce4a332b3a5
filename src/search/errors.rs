//! Search error types
//!
//! Error codes:
//! - AERO_SEARCH_INVALID_PARAM (REJECT): malformed request parameter
//! - codes of the wrapped query, join and collection errors otherwise

use thiserror::Error;

use crate::collection::CollectionError;
use crate::errors::Severity;
use crate::join::JoinError;
use crate::query::QueryError;

/// Errors returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// Evaluation failure other than parse or resolution errors
    #[error(transparent)]
    Join(JoinError),

    #[error("Invalid request parameter '{param}': {reason}")]
    InvalidParam { param: String, reason: String },
}

impl SearchError {
    pub fn invalid_param(param: impl Into<String>, reason: impl Into<String>) -> Self {
        SearchError::InvalidParam {
            param: param.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Query(e) => e.code(),
            SearchError::Collection(e) => e.code(),
            SearchError::Join(e) => e.code(),
            SearchError::InvalidParam { .. } => "AERO_SEARCH_INVALID_PARAM",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SearchError::Query(e) => e.severity(),
            SearchError::Collection(e) => e.severity(),
            SearchError::Join(e) => e.severity(),
            SearchError::InvalidParam { .. } => Severity::Reject,
        }
    }
}

/// Unwraps query and collection failures so callers match one variant
/// regardless of whether they surfaced inside a join.
impl From<JoinError> for SearchError {
    fn from(err: JoinError) -> Self {
        match err {
            JoinError::Query(e) => SearchError::Query(e),
            JoinError::Collection(e) => SearchError::Collection(e),
            other => SearchError::Join(other),
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_errors_flatten() {
        let err: SearchError = JoinError::Collection(CollectionError::NotFound("c".into())).into();
        assert_eq!(err, SearchError::Collection(CollectionError::NotFound("c".into())));
        assert_eq!(err.code(), "AERO_COLLECTION_NOT_FOUND");

        let err: SearchError = JoinError::Query(QueryError::UnresolvedParameter("qq".into())).into();
        assert_eq!(err.code(), "AERO_QUERY_UNRESOLVED_PARAM");

        let err: SearchError = JoinError::TimeLimitExceeded { limit_ms: 5 }.into();
        assert_eq!(err.code(), "AERO_QUERY_TIME_LIMIT");
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn test_invalid_param() {
        let err = SearchError::invalid_param("rows", "not a number");
        assert_eq!(err.code(), "AERO_SEARCH_INVALID_PARAM");
        assert_eq!(err.severity(), Severity::Reject);
        assert!(err.to_string().contains("rows"));
    }
}
