//! End-to-end tests: a live proxy instance against a programmable mock
//! upstream.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::net::TcpListener;

use wallet_summary_proxy::config::ProxyConfig;
use wallet_summary_proxy::http::HttpServer;
use wallet_summary_proxy::summary::WalletSummary;

mod common;

const FULL_PAYLOAD: &str = r#"{
    "cardsList": [
        {"data": {"stats": [{"sortingKey": "transaction_count", "value": 42}]}}
    ],
    "widget": {"data": {
        "activeDays": {"value": 7},
        "lastUse": "2024-01-01T00:00:00Z"
    }},
    "walletPerformance": {"topPercent": 12.345}
}"#;

/// Config pointed at the mock upstream, with test-friendly delays.
fn test_config(upstream_addr: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = format!("http://{}", upstream_addr);
    config.upstream.attempt_timeout_ms = 1_000;
    config.retries.base_delay_ms = 50;
    config.retries.max_delay_ms = 200;
    config
}

async fn start_proxy(mut config: ProxyConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

fn summary_url(proxy: SocketAddr, address: &str) -> String {
    format!("http://{}/api/wallet-summary?address={}", proxy, address)
}

/// Days between the fixture's lastUse and now, rendered like the proxy.
fn expected_days_ago() -> String {
    let last_use = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let days = (Utc::now() - last_use)
        .num_milliseconds()
        .div_euclid(24 * 60 * 60 * 1000);
    format!("{} 天前", days)
}

#[tokio::test]
async fn missing_address_is_rejected_without_upstream_call() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, FULL_PAYLOAD.to_string())
        }
    })
    .await;

    let proxy = start_proxy(test_config(upstream)).await;
    let client = client();

    for url in [
        format!("http://{}/api/wallet-summary", proxy),
        format!("http://{}/api/wallet-summary?address=", proxy),
        format!("http://{}/api/wallet-summary?address=%20%20", proxy),
    ] {
        let res = client.get(url).send().await.unwrap();
        assert_eq!(res.status(), 400);

        let body: serde_json::Value = res.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("address"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0, "no upstream call expected");
}

#[tokio::test]
async fn summary_is_transformed_and_second_request_hits_cache() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, FULL_PAYLOAD.to_string())
        }
    })
    .await;

    let proxy = start_proxy(test_config(upstream)).await;
    let client = client();

    let res = client
        .get(summary_url(proxy, "0xabc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let summary: WalletSummary = res.json().await.unwrap();
    assert_eq!(summary.address, "0xabc");
    assert_eq!(summary.transaction_count, 42);
    assert_eq!(summary.active_days, 7);
    assert_eq!(summary.top_percent, "12.35");
    assert_eq!(summary.last_use, "2024-01-01T00:00:00Z");
    assert_eq!(summary.days_ago, expected_days_ago());

    let cached: WalletSummary = client
        .get(summary_url(proxy, "0xabc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cached, summary);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "cache hit must not refetch");
}

#[tokio::test]
async fn cache_entry_expires_after_ttl() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, FULL_PAYLOAD.to_string())
        }
    })
    .await;

    let mut config = test_config(upstream);
    config.cache.ttl_secs = 1;
    let proxy = start_proxy(config).await;
    let client = client();

    let first = client.get(summary_url(proxy, "0xttl")).send().await.unwrap();
    assert_eq!(first.status(), 200);

    tokio::time::sleep(Duration::from_millis(1_200)).await;

    let second = client.get(summary_url(proxy, "0xttl")).send().await.unwrap();
    assert_eq!(second.status(), 200);
    assert_eq!(calls.load(Ordering::SeqCst), 2, "expired entry must refetch");
}

#[tokio::test]
async fn empty_payload_degrades_to_defaults() {
    let upstream =
        common::start_programmable_upstream(|| async { (200, "{}".to_string()) }).await;
    let proxy = start_proxy(test_config(upstream)).await;

    let summary: WalletSummary = client()
        .get(summary_url(proxy, "0xempty"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary.transaction_count, 0);
    assert_eq!(summary.active_days, 0);
    assert_eq!(summary.top_percent, "0.00");
    assert_eq!(summary.last_use, "");
    assert_eq!(summary.days_ago, "未知");
}

#[tokio::test]
async fn upstream_failures_are_retried_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            let count = counter.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                (503, r#"{"error": "unavailable"}"#.to_string())
            } else {
                (200, FULL_PAYLOAD.to_string())
            }
        }
    })
    .await;

    let proxy = start_proxy(test_config(upstream)).await;
    let client = client();

    let res = client
        .get(summary_url(proxy, "0xretry"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200, "should succeed after retries");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // The successful summary landed in the cache.
    let cached = client
        .get(summary_url(proxy, "0xretry"))
        .send()
        .await
        .unwrap();
    assert_eq!(cached.status(), 200);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_the_upstream_status() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (503, r#"{"error": "unavailable"}"#.to_string())
        }
    })
    .await;

    let proxy = start_proxy(test_config(upstream)).await;

    let res = client()
        .get(summary_url(proxy, "0xdown"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(calls.load(Ordering::SeqCst), 3, "budget is three attempts");

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn upstream_timeouts_surface_gateway_timeout() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(500)).await;
            (200, FULL_PAYLOAD.to_string())
        }
    })
    .await;

    let mut config = test_config(upstream);
    config.upstream.attempt_timeout_ms = 150;
    let proxy = start_proxy(config).await;

    let res = client()
        .get(summary_url(proxy, "0xslow"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 504);
    assert_eq!(
        calls.load(Ordering::SeqCst),
        3,
        "every attempt must time out individually"
    );
}

#[tokio::test]
async fn no_retry_config_makes_a_single_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (503, r#"{"error": "unavailable"}"#.to_string())
        }
    })
    .await;

    let mut config = test_config(upstream);
    config.retries.enabled = false;
    let proxy = start_proxy(config).await;

    let res = client()
        .get(summary_url(proxy, "0xonce"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn options_preflight_gets_permissive_cors() {
    let upstream =
        common::start_programmable_upstream(|| async { (200, "{}".to_string()) }).await;
    let proxy = start_proxy(test_config(upstream)).await;
    let client = client();

    // Browser-style preflight.
    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/api/wallet-summary", proxy),
        )
        .header("origin", "https://example.com")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let allow_methods = res
        .headers()
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(allow_methods.contains("GET"));

    // Bare OPTIONS without preflight headers still succeeds with an
    // empty body.
    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/api/wallet-summary", proxy),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "");
}
