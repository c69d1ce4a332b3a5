//! Execution budget for one outer query
//!
//! Long-running steps (sub-query scans, inverted index construction) poll the
//! budget and stop as soon as the outer query is cancelled or out of time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::errors::{JoinError, JoinResult};

/// Cancellation flag plus optional deadline
#[derive(Debug, Clone)]
pub struct ExecutionBudget {
    cancelled: Arc<AtomicBool>,
    deadline: Option<(Instant, Duration)>,
}

impl ExecutionBudget {
    /// A budget that never runs out
    pub fn unlimited() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A budget that expires `limit` from now
    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some((Instant::now() + limit, limit)),
        }
    }

    /// Returns a handle that can cancel this budget from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Returns true once cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails if the query was cancelled or its deadline has passed
    pub fn check(&self) -> JoinResult<()> {
        if self.is_cancelled() {
            return Err(JoinError::Cancelled("outer query aborted".to_string()));
        }
        if let Some((deadline, limit)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(JoinError::TimeLimitExceeded {
                    limit_ms: limit.as_millis() as u64,
                });
            }
        }
        Ok(())
    }
}

impl Default for ExecutionBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Cancels the budget it was taken from
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
