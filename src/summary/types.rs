//! Payload and summary types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw wallet-analytics payload as returned by the upstream API.
///
/// Every field is optional: the upstream omits or nulls nested objects
/// freely, and a missing field must degrade to a default in the summary
/// rather than fail the request. Stat values arrive as either integers
/// or floats, so they stay as raw JSON values until extraction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletPayload {
    pub cards_list: Option<Vec<Card>>,
    pub widget: Option<Widget>,
    pub wallet_performance: Option<WalletPerformance>,
}

/// One card from the upstream `cardsList`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Card {
    pub data: Option<CardData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardData {
    pub stats: Option<Vec<StatEntry>>,
}

/// A single stat row, keyed by `sortingKey`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatEntry {
    pub sorting_key: Option<String>,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Widget {
    pub data: Option<WidgetData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetData {
    pub active_days: Option<ActiveDays>,
    pub last_use: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActiveDays {
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletPerformance {
    pub top_percent: Option<f64>,
}

/// Compact caller-facing summary of one wallet.
///
/// Built once per successful upstream call and immutable afterwards;
/// this is also the value stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub address: String,
    pub transaction_count: u64,
    pub active_days: u64,
    /// Percentile rank formatted to exactly two decimal places.
    pub top_percent: String,
    /// Last-use timestamp exactly as the upstream reported it.
    pub last_use: String,
    /// Human-readable age of `last_use`, e.g. "3 天前"; "未知" when the
    /// timestamp is absent or unparsable.
    pub days_ago: String,
}
