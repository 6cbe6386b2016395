//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the orchestration client.
///
/// Every field has a default, so partial configuration files work:
///
/// ```
/// use courier::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{ "timeout": "2s", "max_retries": 5 }"#,
/// ).unwrap();
/// assert_eq!(config.max_retries, 5);
/// assert!(config.enable_cache);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-attempt deadline (e.g., "10s", "500ms").
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Base delay before the first retry (e.g., "1s").
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,

    /// Multiplier applied to the delay for each further retry.
    pub retry_delay_multiplier: f64,

    /// Time-to-live for cached responses (e.g., "5m").
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Maximum number of cached entries before FIFO eviction.
    pub max_cache_size: usize,

    /// Whether GET-like responses are cached.
    pub enable_cache: bool,

    /// Whether failed attempts are retried.
    pub enable_retry: bool,

    /// Whether concurrent identical requests share one transport call.
    pub enable_deduplication: bool,

    /// Maximum number of concurrently executing requests.
    pub max_concurrent: usize,

    /// How long a request may wait for admission (e.g., "30s").
    #[serde(with = "humantime_serde")]
    pub queue_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            retry_delay_multiplier: 2.0,
            cache_ttl: Duration::from_secs(300),
            max_cache_size: 100,
            enable_cache: true,
            enable_retry: true,
            enable_deduplication: true,
            max_concurrent: 6,
            queue_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.retry_delay_multiplier, 2.0);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.max_cache_size, 100);
        assert!(config.enable_cache);
        assert!(config.enable_retry);
        assert!(config.enable_deduplication);
        assert_eq!(config.max_concurrent, 6);
        assert_eq!(config.queue_timeout, Duration::from_secs(30));
    }

    #[test]
    fn durations_parse_from_humantime() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "retry_delay": "250ms", "queue_timeout": "1m" }"#).unwrap();
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.queue_timeout, Duration::from_secs(60));
    }
}
