//! Query string access
//!
//! Handlers read raw `(name, value)` pairs so repeated keys (`ids=a&ids=b`)
//! and empty values (`searchTerm=`) can both be handled: empty values count
//! as absent.

use std::str::FromStr;

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use super::response::ApiError;

/// Default page size of list endpoints
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw query pairs of a request
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == name || k.strip_suffix("[]") == Some(name))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value of `name`
    pub fn text(&self, name: &str) -> Option<String> {
        self.values(name).next().map(str::to_string)
    }

    /// Every non-empty value of `name` (also accepts `name[]`)
    pub fn list(&self, name: &str) -> Vec<String> {
        self.values(name).map(str::to_string).collect()
    }

    /// Parse the first non-empty value of `name`
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, ApiError>
    where
        T: FromStr,
    {
        match self.values(name).next() {
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                ApiError::BadRequest(format!("Invalid value for {}: {}", name, raw))
            }),
            None => Ok(None),
        }
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>, ApiError> {
        self.parse::<i64>(name)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {}", e.body_text())))?;
        Ok(Self(pairs))
    }
}
