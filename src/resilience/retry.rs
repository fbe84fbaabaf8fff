//! Retry state machine for the upstream fetch.
//!
//! The machine is pure: `RetryPolicy` computes transitions, the caller
//! owns the clock and the sleeping. This keeps the attempt/backoff logic
//! testable without an executor and portable across sync and async
//! drivers.

use std::time::Duration;

use crate::resilience::backoff::calculate_backoff;

/// Attempt budget and backoff parameters for one logical fetch.
///
/// Each fetch starts its own fresh loop; there is no cross-request retry
/// budget or circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the initial one included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each retry after that.
    pub base_delay_ms: u64,
    /// Upper bound on any single delay.
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// A single-attempt policy (retries disabled).
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Initial state: about to make the first attempt.
    pub fn start(&self) -> RetryState {
        RetryState::Attempting { attempt: 1 }
    }

    /// Transition after attempt `attempt` (1-based) succeeded.
    pub fn on_success(&self) -> RetryState {
        RetryState::Succeeded
    }

    /// Transition after attempt `attempt` (1-based) failed.
    ///
    /// Either schedules a wait before the next attempt or, when the
    /// budget is spent, ends the machine in `Exhausted`.
    pub fn on_failure(&self, attempt: u32) -> RetryState {
        if attempt >= self.max_attempts {
            RetryState::Exhausted
        } else {
            RetryState::Waiting {
                next_attempt: attempt + 1,
                delay: calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms),
            }
        }
    }
}

/// Where one fetch currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// An attempt is in flight.
    Attempting { attempt: u32 },
    /// Sleeping out the backoff delay before `next_attempt`.
    Waiting { next_attempt: u32, delay: Duration },
    /// Terminal: an attempt returned a payload.
    Succeeded,
    /// Terminal: the attempt budget is spent.
    Exhausted,
}

impl RetryState {
    /// Terminal states end the loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded | RetryState::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }

    #[test]
    fn walks_attempt_wait_attempt_until_exhausted() {
        let policy = policy();

        let state = policy.start();
        assert_eq!(state, RetryState::Attempting { attempt: 1 });

        let state = policy.on_failure(1);
        assert_eq!(
            state,
            RetryState::Waiting {
                next_attempt: 2,
                delay: Duration::from_millis(1000),
            }
        );

        let state = policy.on_failure(2);
        assert_eq!(
            state,
            RetryState::Waiting {
                next_attempt: 3,
                delay: Duration::from_millis(2000),
            }
        );

        let state = policy.on_failure(3);
        assert_eq!(state, RetryState::Exhausted);
        assert!(state.is_terminal());
    }

    #[test]
    fn success_is_terminal_from_any_attempt() {
        let state = policy().on_success();
        assert_eq!(state, RetryState::Succeeded);
        assert!(state.is_terminal());
    }

    #[test]
    fn single_attempt_policy_never_waits() {
        let policy = RetryPolicy::single_attempt();
        assert_eq!(policy.start(), RetryState::Attempting { attempt: 1 });
        assert_eq!(policy.on_failure(1), RetryState::Exhausted);
    }

    #[test]
    fn non_terminal_states() {
        assert!(!RetryState::Attempting { attempt: 1 }.is_terminal());
        assert!(!RetryState::Waiting {
            next_attempt: 2,
            delay: Duration::from_millis(1)
        }
        .is_terminal());
    }
}
