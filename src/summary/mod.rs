//! Wallet summary domain.
//!
//! `types` models the loosely structured upstream payload and the compact
//! summary returned to callers; `transform` holds the pure reshaping rules.

pub mod transform;
pub mod types;

pub use transform::summarize;
pub use types::{WalletPayload, WalletSummary};
