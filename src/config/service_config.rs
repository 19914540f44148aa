//! Forecast service connection settings parsed from environment variables.

use std::env;
use std::time::Duration;

pub const DEVELOPMENT_API_URL: &str = "http://127.0.0.1:8000";

/// Where and how to reach the forecast service
#[derive(Debug, Clone)]
pub struct ServiceEnvConfig {
    /// Empty when unset in a production deployment
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub mock_latency: Duration,
}

impl ServiceEnvConfig {
    pub fn from_env(default_base_url: &str) -> Self {
        Self {
            base_url: env::var("PREDICTION_API_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| default_base_url.to_string()),
            request_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 30)),
            connect_timeout: Duration::from_secs(parse_or("HTTP_CONNECT_TIMEOUT_SECS", 10)),
            mock_latency: Duration::from_millis(parse_or("MOCK_LATENCY_MS", 400)),
        }
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back_on_missing_key() {
        assert_eq!(parse_or("FUSIONQUANT_TEST_UNSET_KEY", 17), 17);
    }
}
