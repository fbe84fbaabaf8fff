//! Upstream wallet-analytics API access.
//!
//! One client, one endpoint: `GET {base_url}/be-api/protocol_wallets/
//! {protocol}/{address}`. The client owns the per-attempt deadline and
//! the retry loop; callers see a single fallible fetch.

pub mod client;

pub use client::WalletApiClient;
