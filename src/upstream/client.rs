//! HTTP client for the wallet-analytics upstream.

use std::time::Duration;

use crate::config::{RetryConfig, UpstreamConfig};
use crate::error::{ProxyError, ProxyResult};
use crate::observability::metrics;
use crate::resilience::{RetryPolicy, RetryState};
use crate::summary::WalletPayload;

/// Client for the third-party wallet-analytics API.
///
/// Each `fetch_wallet` call runs its own fresh attempt loop; there is no
/// cross-request state beyond the connection pool inside `reqwest`.
#[derive(Debug, Clone)]
pub struct WalletApiClient {
    client: reqwest::Client,
    base_url: String,
    protocol: String,
    attempt_timeout: Duration,
    policy: RetryPolicy,
}

impl WalletApiClient {
    /// Build a client from configuration.
    pub fn new(upstream: &UpstreamConfig, retries: &RetryConfig) -> Self {
        let policy = if retries.enabled {
            RetryPolicy {
                max_attempts: retries.max_attempts,
                base_delay_ms: retries.base_delay_ms,
                max_delay_ms: retries.max_delay_ms,
            }
        } else {
            RetryPolicy::single_attempt()
        };

        Self {
            client: reqwest::Client::new(),
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            protocol: upstream.protocol.clone(),
            attempt_timeout: Duration::from_millis(upstream.attempt_timeout_ms),
            policy,
        }
    }

    /// Full URL of the wallet endpoint for one address.
    pub fn wallet_url(&self, address: &str) -> String {
        format!(
            "{}/be-api/protocol_wallets/{}/{}",
            self.base_url, self.protocol, address
        )
    }

    /// Fetch the raw payload for `address`, retrying per the policy.
    ///
    /// Drives the retry state machine: attempts run under the per-attempt
    /// deadline, failures schedule a backoff sleep, and once the budget
    /// is spent the last attempt's error is surfaced unchanged.
    pub async fn fetch_wallet(&self, address: &str) -> ProxyResult<WalletPayload> {
        let url = self.wallet_url(address);
        let mut state = self.policy.start();
        let mut last_error = None;

        while !state.is_terminal() {
            state = match state {
                RetryState::Attempting { attempt } => {
                    tracing::debug!(%address, attempt, %url, "fetching upstream wallet");
                    metrics::record_upstream_attempt();

                    match self.attempt(&url).await {
                        Ok(payload) => {
                            tracing::debug!(%address, attempt, "upstream fetch succeeded");
                            return Ok(payload);
                        }
                        Err(err) => {
                            metrics::record_upstream_failure(failure_kind(&err));
                            let next = if err.is_retryable() {
                                self.policy.on_failure(attempt)
                            } else {
                                RetryState::Exhausted
                            };
                            match next {
                                RetryState::Waiting { delay, .. } => {
                                    tracing::warn!(
                                        %address,
                                        attempt,
                                        error = %err,
                                        delay_ms = delay.as_millis() as u64,
                                        "upstream attempt failed, retrying"
                                    );
                                }
                                _ => {
                                    tracing::error!(
                                        %address,
                                        attempt,
                                        error = %err,
                                        "upstream attempts exhausted"
                                    );
                                }
                            }
                            last_error = Some(err);
                            next
                        }
                    }
                }
                RetryState::Waiting { next_attempt, delay } => {
                    tokio::time::sleep(delay).await;
                    RetryState::Attempting {
                        attempt: next_attempt,
                    }
                }
                terminal => terminal,
            };
        }

        Err(last_error
            .unwrap_or_else(|| ProxyError::Unexpected("no upstream attempt was made".to_string())))
    }

    /// One attempt under the per-attempt deadline. The timeout cancels
    /// the in-flight request future; other attempts and requests are
    /// unaffected.
    async fn attempt(&self, url: &str) -> ProxyResult<WalletPayload> {
        match tokio::time::timeout(self.attempt_timeout, self.request(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProxyError::Timeout),
        }
    }

    async fn request(&self, url: &str) -> ProxyResult<WalletPayload> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ProxyError::Unexpected(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<WalletPayload>()
            .await
            .map_err(|err| ProxyError::Unexpected(format!("invalid upstream payload: {err}")))
    }
}

fn failure_kind(err: &ProxyError) -> &'static str {
    match err {
        ProxyError::Timeout => "timeout",
        ProxyError::UpstreamStatus { .. } => "status",
        ProxyError::Unexpected(_) => "network",
        ProxyError::MissingAddress => "validation",
    }
}
