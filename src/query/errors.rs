//! Query parsing error types
//!
//! Error codes:
//! - AERO_QUERY_CONFIGURATION (REJECT): missing or malformed local parameter
//! - AERO_QUERY_SYNTAX (REJECT): query text the selected parser cannot read
//! - AERO_QUERY_UNRESOLVED_PARAM (REJECT): `$name` names no request parameter

use thiserror::Error;

use crate::errors::Severity;

/// Errors raised before any evaluation starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A local parameter is missing or malformed
    #[error("Invalid parameter '{param}': {reason}")]
    Configuration { param: String, reason: String },

    /// Query text could not be parsed
    #[error("Syntax error in '{text}': {reason}")]
    Syntax { text: String, reason: String },

    /// A `$name` reference names a parameter absent from the request
    #[error("Unresolved parameter reference: ${0}")]
    UnresolvedParameter(String),
}

impl QueryError {
    pub fn configuration(param: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::Configuration {
            param: param.into(),
            reason: reason.into(),
        }
    }

    pub fn syntax(text: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::Syntax {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Configuration { .. } => "AERO_QUERY_CONFIGURATION",
            QueryError::Syntax { .. } => "AERO_QUERY_SYNTAX",
            QueryError::UnresolvedParameter(_) => "AERO_QUERY_UNRESOLVED_PARAM",
        }
    }

    /// All parse errors reject the request
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

/// Result type for query parsing
pub type QueryResult<T> = Result<T, QueryError>;
