//! The wallet summary handler.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::{ProxyError, ProxyResult};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::summary::{summarize, WalletSummary};

/// Query parameters of the summary route.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub address: Option<String>,
}

/// `GET /api/wallet-summary?address=...`
///
/// Cache hit short-circuits the upstream entirely; a miss always makes
/// at least one upstream attempt. Failures are never cached.
pub async fn wallet_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ProxyResult<Json<WalletSummary>> {
    let start = Instant::now();

    let address = match query.address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => address.to_string(),
        _ => {
            tracing::warn!("request rejected: missing address parameter");
            metrics::record_request("GET", 400, "error", start);
            return Err(ProxyError::MissingAddress);
        }
    };

    if state.cache_enabled {
        if let Some(summary) = state.cache.get(&address) {
            tracing::debug!(%address, "cache hit");
            metrics::record_cache_hit();
            metrics::record_request("GET", 200, "cache", start);
            return Ok(Json(summary));
        }
        metrics::record_cache_miss();
    }

    let payload = match state.upstream.fetch_wallet(&address).await {
        Ok(payload) => payload,
        Err(err) => {
            metrics::record_request("GET", err.status_code().as_u16(), "error", start);
            return Err(err);
        }
    };

    let summary = summarize(&address, &payload, Utc::now());
    if state.cache_enabled {
        state.cache.insert(address.clone(), summary.clone());
    }

    tracing::info!(%address, "summary served from upstream");
    metrics::record_request("GET", 200, "upstream", start);
    Ok(Json(summary))
}

/// Answer bare `OPTIONS` with an empty success body. The CORS layer adds
/// the permissive headers and handles real browser preflights itself.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
