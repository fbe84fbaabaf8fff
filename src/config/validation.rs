//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees. Validation is
//! a pure function over `ProxyConfig` and reports every violation, not
//! just the first one.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// One semantic violation found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a valid socket address: {:?}", config.listener.bind_address),
        });
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: "upstream.base_url",
            message: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(err) => errors.push(ValidationError {
            field: "upstream.base_url",
            message: format!("not a valid URL: {}", err),
        }),
    }

    if config.upstream.protocol.trim().is_empty() {
        errors.push(ValidationError {
            field: "upstream.protocol",
            message: "must not be empty".to_string(),
        });
    }

    if config.upstream.attempt_timeout_ms == 0 {
        errors.push(ValidationError {
            field: "upstream.attempt_timeout_ms",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError {
            field: "retries.max_attempts",
            message: "must be at least 1".to_string(),
        });
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError {
            field: "retries.base_delay_ms",
            message: "must not exceed retries.max_delay_ms".to_string(),
        });
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError {
            field: "cache.ttl_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "not a valid socket address: {:?}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "nowhere".to_string();
        config.upstream.base_url = "not a url".to_string();
        config.retries.max_attempts = 0;
        config.cache.ttl_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"upstream.base_url"));
        assert!(fields.contains(&"retries.max_attempts"));
        assert!(fields.contains(&"cache.ttl_secs"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn rejects_non_http_upstream_scheme() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "ftp://layerhub.xyz".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "upstream.base_url");
    }

    #[test]
    fn rejects_empty_protocol_segment() {
        let mut config = ProxyConfig::default();
        config.upstream.protocol = "  ".to_string();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn metrics_address_only_checked_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "bogus".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
