//! Collection error types
//!
//! Error codes:
//! - AERO_COLLECTION_NOT_FOUND (REJECT)
//! - AERO_COLLECTION_UNAVAILABLE (ERROR)
//! - AERO_DOCUMENT_INVALID (REJECT)

use thiserror::Error;

use crate::errors::Severity;

/// Errors raised while resolving or mutating collections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A collection reference does not name a live collection
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// The collection could not be reached within the resolution timeout
    #[error("Collection '{name}' unavailable: no response within {timeout_ms}ms")]
    Unavailable { name: String, timeout_ms: u64 },

    /// A document was rejected on insert
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl CollectionError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CollectionError::NotFound(_) => "AERO_COLLECTION_NOT_FOUND",
            CollectionError::Unavailable { .. } => "AERO_COLLECTION_UNAVAILABLE",
            CollectionError::InvalidDocument(_) => "AERO_DOCUMENT_INVALID",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            CollectionError::Unavailable { .. } => Severity::Error,
            _ => Severity::Reject,
        }
    }

    /// Unavailability may be retried by the caller; nothing here retries it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollectionError::Unavailable { .. })
    }
}

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;
