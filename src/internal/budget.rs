//! Per-operation run budget shared by the three matchers.

use std::time::Instant;

use crate::{Result, RgxError, RgxErrorKind, Span};

/// The wall-clock budget of one operation, measured from operation entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    started: Instant,
    timeout_ms: u64,
}

impl Budget {
    pub(crate) fn new(started: Instant, timeout_ms: u64) -> Self {
        Self {
            started,
            timeout_ms,
        }
    }

    /// Fail with a Timeout error once the elapsed wall-clock time exceeds
    /// the budget.
    #[inline]
    pub(crate) fn check(&self) -> Result<()> {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        if elapsed_ms > self.timeout_ms {
            return Err(RgxError::new(RgxErrorKind::Timeout {
                timeout_ms: self.timeout_ms,
                elapsed_ms,
            }));
        }
        Ok(())
    }
}

/// The outcome of a single `match_full` or `find` run: the span of the
/// match, if any, and the matcher-specific work counter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatcherRun {
    pub(crate) span: Option<Span>,
    pub(crate) work: u64,
}
