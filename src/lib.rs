//! Wallet Summary Proxy Library

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod summary;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
