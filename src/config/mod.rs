//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared with the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so an absent or minimal config works
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every violation at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RetryConfig, TimeoutConfig,
    UpstreamConfig,
};
