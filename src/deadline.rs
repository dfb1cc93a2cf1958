//! Per-call time budgets
//!
//! A [`Deadline`] is checked between pipeline stages and on every iteration
//! of the iterative kernels (SVD, PageRank), so an expired budget stops a
//! long stage at its next iteration.

use crate::errors::{Result, SummarizeError};
use std::time::{Duration, Instant};

/// Wall-clock budget of one summarize call
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start the clock
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A deadline that never expires
    pub fn unbounded() -> Self {
        Self::start(None)
    }

    /// The configured budget, if any
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Fail with `DeadlineExceeded` if the budget is spent
    pub fn check(&self, stage: &'static str) -> Result<()> {
        match self.limit {
            Some(limit) if self.started.elapsed() > limit => {
                Err(SummarizeError::DeadlineExceeded { stage, limit })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) fn expired() -> Deadline {
    let deadline = Deadline::start(Some(Duration::from_millis(1)));
    std::thread::sleep(Duration::from_millis(5));
    deadline
}
