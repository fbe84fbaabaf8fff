//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / upstream client produce:
//!     → tracing events (structured, with address and attempt fields)
//!     → metrics.rs (counters, histogram)
//!
//! Consumers:
//!     → Log output (stdout, EnvFilter-controlled)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Log and metric emission is fire-and-forget; no return-value contract
//! - Metrics are cheap (atomic increments) and optional at runtime
//! - The exporter binds its own address, separate from the service port

pub mod metrics;
