//! Join error types
//!
//! Every failure here aborts the whole outer query. Empty fields are not
//! errors: they produce empty results.
//!
//! Error codes:
//! - AERO_QUERY_CONFIGURATION / AERO_QUERY_SYNTAX / AERO_QUERY_UNRESOLVED_PARAM (REJECT)
//! - AERO_COLLECTION_NOT_FOUND (REJECT)
//! - AERO_COLLECTION_UNAVAILABLE (ERROR)
//! - AERO_QUERY_CANCELLED (ERROR)
//! - AERO_QUERY_TIME_LIMIT (ERROR)

use thiserror::Error;

use crate::collection::CollectionError;
use crate::errors::Severity;
use crate::query::QueryError;

/// Errors raised while evaluating a join
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// Parse-time failure (configuration, syntax, parameter reference)
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The from-collection could not be resolved
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// The outer query was aborted
    #[error("Query cancelled: {0}")]
    Cancelled(String),

    /// The outer query ran out of time
    #[error("Query exceeded its time limit of {limit_ms}ms")]
    TimeLimitExceeded { limit_ms: u64 },
}

impl JoinError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            JoinError::Query(e) => e.code(),
            JoinError::Collection(e) => e.code(),
            JoinError::Cancelled(_) => "AERO_QUERY_CANCELLED",
            JoinError::TimeLimitExceeded { .. } => "AERO_QUERY_TIME_LIMIT",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            JoinError::Query(e) => e.severity(),
            JoinError::Collection(e) => e.severity(),
            JoinError::Cancelled(_) | JoinError::TimeLimitExceeded { .. } => Severity::Error,
        }
    }
}

/// Result type for join operations
pub type JoinResult<T> = Result<T, JoinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_delegate() {
        let err: JoinError = CollectionError::NotFound("depts".into()).into();
        assert_eq!(err.code(), "AERO_COLLECTION_NOT_FOUND");
        assert_eq!(err.severity(), Severity::Reject);
        assert_eq!(err.to_string(), "Collection not found: depts");

        let err: JoinError = QueryError::UnresolvedParameter("qq".into()).into();
        assert_eq!(err.code(), "AERO_QUERY_UNRESOLVED_PARAM");
    }

    #[test]
    fn test_runtime_errors() {
        let err = JoinError::TimeLimitExceeded { limit_ms: 5 };
        assert_eq!(err.code(), "AERO_QUERY_TIME_LIMIT");
        assert_eq!(err.severity(), Severity::Error);
    }
}
