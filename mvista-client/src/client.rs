//! HTTP client for the MusicVista API

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::endpoints::{AlbumsApi, ArtistsApi, InsightsApi, TracksApi};
use crate::error::ClientError;

/// Query string pairs; absent and empty values are never added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs(Vec<(&'static str, String)>);

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opt<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.0.push((key, value));
            }
        }
        self
    }

    /// One `key=value` pair per item
    pub fn list(mut self, key: &'static str, values: &[String]) -> Self {
        self.0.extend(
            values
                .iter()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.clone())),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// Response envelope with the payload left undecoded
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// MusicVista API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mvista-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn artists(&self) -> ArtistsApi<'_> {
        ArtistsApi::new(self)
    }

    pub fn albums(&self) -> AlbumsApi<'_> {
        AlbumsApi::new(self)
    }

    pub fn tracks(&self) -> TracksApi<'_> {
        TracksApi::new(self)
    }

    pub fn insights(&self) -> InsightsApi<'_> {
        InsightsApi::new(self)
    }

    /// URL of the endpoint at `segments` under the base URL.
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `#`
    /// stay a single path segment.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let base = self.config.url("");
        let mut url =
            Url::parse(&base).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET the endpoint at `segments` and decode the envelope's `data`
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &QueryPairs,
    ) -> Result<T, ClientError> {
        let url = self.endpoint_url(segments)?;
        debug!(url = %url, params = ?query.pairs(), "GET");

        let mut request = self.http.get(url.clone());
        if !query.is_empty() {
            request = request.query(query.pairs());
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let envelope = serde_json::from_str::<RawEnvelope>(&body).ok();

        if !status.is_success() {
            let detail = envelope.and_then(|e| e.error);
            return Err(ClientError::from_status(status.as_u16(), detail));
        }

        let envelope = envelope
            .ok_or_else(|| ClientError::Decode(format!("not an API envelope: {}", url)))?;
        if !envelope.success {
            return Err(ClientError::Api(envelope.error.unwrap_or_default()));
        }
        serde_json::from_value(envelope.data.unwrap_or(Value::Null))
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_absent_and_empty() {
        let q = QueryPairs::new()
            .opt("searchTerm", Some(""))
            .opt("genreFilter", None::<String>)
            .opt("limit", Some(10))
            .list("ids", &["a1".to_string(), String::new(), "a2".to_string()]);
        assert_eq!(
            q.pairs(),
            &[
                ("limit", "10".to_string()),
                ("ids", "a1".to_string()),
                ("ids", "a2".to_string()),
            ]
        );
        assert!(QueryPairs::new().opt("x", Some("")).is_empty());
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(ApiConfig::new(base_url)).unwrap()
    }

    #[test]
    fn test_endpoint_url_encodes_each_segment() {
        let c = client("http://localhost:3001/api/");
        assert_eq!(
            c.endpoint_url(&["tracks", "a/b?c#d", "lyrics"]).unwrap().as_str(),
            "http://localhost:3001/api/tracks/a%2Fb%3Fc%23d/lyrics"
        );
        assert_eq!(
            client("http://localhost:3001/api")
                .endpoint_url(&["artists", "search"])
                .unwrap()
                .as_str(),
            "http://localhost:3001/api/artists/search"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_relative_base() {
        let err = client("/api").endpoint_url(&["tracks"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
