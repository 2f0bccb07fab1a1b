//! Client connection settings

use std::time::Duration;

use tracing::warn;

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "MVISTA_API_BASE_URL";
/// Environment variable holding the request timeout in milliseconds
pub const TIMEOUT_ENV: &str = "MVISTA_API_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read settings from the environment, falling back to defaults.
    ///
    /// Empty values are ignored. A timeout that is not a positive integer is
    /// logged and replaced by the default.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    warn!("Ignoring invalid {}={}", TIMEOUT_ENV, raw);
                    DEFAULT_TIMEOUT
                }
            },
            _ => DEFAULT_TIMEOUT,
        };

        Self { base_url, timeout }
    }

    /// Absolute URL of `endpoint` under this base
    pub fn url(&self, endpoint: &str) -> String {
        build_api_url(&self.base_url, endpoint)
    }
}

/// Join `base` and `endpoint` with exactly one slash.
///
/// Absolute `http://` and `https://` endpoints are returned unchanged.
pub fn build_api_url(base: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_url_single_slash() {
        let expected = "http://localhost:3001/api/artists/search";
        assert_eq!(build_api_url("http://localhost:3001/api", "artists/search"), expected);
        assert_eq!(build_api_url("http://localhost:3001/api/", "/artists/search"), expected);
        assert_eq!(build_api_url("http://localhost:3001/api", "/artists/search"), expected);
        assert_eq!(build_api_url("http://localhost:3001/api/", "artists/search"), expected);
    }

    #[test]
    fn test_build_api_url_absolute_passthrough() {
        assert_eq!(
            build_api_url("http://localhost:3001/api", "https://cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn test_relative_base() {
        assert_eq!(build_api_url("/api", "tracks"), "/api/tracks");
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:3001/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
