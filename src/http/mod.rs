//! HTTP surface of the proxy.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, CORS / request-id / trace / timeout layers)
//!     → summary.rs (validate address, cache lookup, upstream fetch,
//!       transform, cache insert)
//!     → JSON response (WalletSummary or {"error": ...})
//! ```

pub mod server;
pub mod summary;

pub use server::{AppState, HttpServer};
