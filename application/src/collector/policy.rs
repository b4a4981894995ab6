//! Round abandonment policy
//!
//! The engine never gives up on a round by itself. Callers that want
//! recovery opt in here: a deadline for the whole round, an external
//! cancellation token, or both.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct RoundPolicy {
    /// Maximum time to wait for every expected answer
    pub timeout: Option<Duration>,
    /// Cancels the round in flight when triggered
    pub cancellation: Option<CancellationToken>,
}

impl RoundPolicy {
    /// Wait forever, never cancel.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.timeout.is_none() && self.cancellation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert!(RoundPolicy::default().is_unbounded());
        let policy = RoundPolicy::unbounded().with_timeout(Duration::from_secs(30));
        assert_eq!(policy.timeout, Some(Duration::from_secs(30)));
        assert!(!policy.is_unbounded());
    }
}
