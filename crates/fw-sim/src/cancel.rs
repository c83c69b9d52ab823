//! Cooperative cancellation for long runs.
//!
//! Limits are polled once per step, so a tripped token or an expired deadline
//! stops the run within one step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{SimError, SimResult};

/// Shared flag that asks a running simulation to stop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Optional cancel token and wall-clock deadline for one run.
#[derive(Clone, Debug, Default)]
pub struct RunLimits {
    pub cancel: Option<CancelToken>,
    pub deadline: Option<Instant>,
}

impl RunLimits {
    /// No cancellation, no deadline.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fail if the run should stop before executing `step`.
    pub fn check(&self, step: usize) -> SimResult<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(SimError::Cancelled { step });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SimError::TimedOut { step });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_stops() {
        assert!(RunLimits::none().check(1).is_ok());
    }

    #[test]
    fn cancelled_token_stops() {
        let token = CancelToken::new();
        let limits = RunLimits::none().with_cancel(token.clone());
        assert!(limits.check(3).is_ok());

        token.cancel();
        assert_eq!(limits.check(4), Err(SimError::Cancelled { step: 4 }));
    }

    #[test]
    fn expired_deadline_stops() {
        let limits = RunLimits::none().with_deadline(Instant::now());
        assert_eq!(limits.check(1), Err(SimError::TimedOut { step: 1 }));
    }

    #[test]
    fn distant_deadline_allows_progress() {
        let limits = RunLimits::none().with_timeout(Duration::from_secs(3600));
        assert!(limits.check(1).is_ok());
    }
}
