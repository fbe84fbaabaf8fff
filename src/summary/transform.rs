//! Transform rules: raw upstream payload to `WalletSummary`.
//!
//! Every rule defaults on absence. The only inputs are the payload, the
//! address and the current time, so the transform is a pure function and
//! tests can pin `now`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::summary::types::{Card, WalletPayload, WalletSummary};

/// The stat row carrying the wallet's transaction count.
const TRANSACTION_COUNT_KEY: &str = "transaction_count";

/// Rendered when `lastUse` is absent or unparsable.
const DAYS_AGO_UNKNOWN: &str = "未知";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Reshape an upstream payload into the caller-facing summary.
pub fn summarize(address: &str, payload: &WalletPayload, now: DateTime<Utc>) -> WalletSummary {
    let transaction_count = payload
        .cards_list
        .as_deref()
        .and_then(<[Card]>::first)
        .and_then(|card| card.data.as_ref())
        .and_then(|data| data.stats.as_ref())
        .and_then(|stats| {
            stats
                .iter()
                .find(|stat| stat.sorting_key.as_deref() == Some(TRANSACTION_COUNT_KEY))
        })
        .and_then(|stat| stat.value.as_ref())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0) as u64;

    let widget_data = payload.widget.as_ref().and_then(|w| w.data.as_ref());

    let active_days = widget_data
        .and_then(|data| data.active_days.as_ref())
        .and_then(|days| days.value.as_ref())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0) as u64;

    let top_percent = payload
        .wallet_performance
        .as_ref()
        .and_then(|perf| perf.top_percent)
        .unwrap_or(0.0);

    let last_use = widget_data
        .and_then(|data| data.last_use.clone())
        .unwrap_or_default();

    let days_ago = match parse_last_use(&last_use) {
        Some(last_use_at) => {
            let days = (now - last_use_at).num_milliseconds().div_euclid(MILLIS_PER_DAY);
            format!("{} 天前", days)
        }
        None => DAYS_AGO_UNKNOWN.to_string(),
    };

    WalletSummary {
        address: address.to_string(),
        transaction_count,
        active_days,
        top_percent: format!("{:.2}", top_percent),
        last_use,
        days_ago,
    }
}

/// Parse the upstream's loosely formatted `lastUse` timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp, or a
/// bare `YYYY-MM-DD` date. Naive values are taken as UTC.
fn parse_last_use(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
