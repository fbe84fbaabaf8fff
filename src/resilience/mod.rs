//! Resilience for the upstream call.
//!
//! # Data Flow
//! ```text
//! Fetch request:
//!     → retry.rs (RetryPolicy drives RetryState transitions)
//!     → backoff.rs (pure delay computation between attempts)
//!     → upstream client enforces the per-attempt timeout and sleeps
//!       through Waiting states
//! ```
//!
//! # Design Decisions
//! - Every attempt has a hard deadline; timeouts are retryable failures
//! - Backoff is pure exponential, no jitter, so delays are predictable
//! - The state machine is independent of any concurrency primitive; the
//!   async driver lives in the upstream client

pub mod backoff;
pub mod retry;

pub use backoff::calculate_backoff;
pub use retry::{RetryPolicy, RetryState};
