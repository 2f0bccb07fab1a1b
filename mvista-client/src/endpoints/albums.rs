//! /albums routes

use mvista_common::models::{Album, Track, TypeDistribution};
use mvista_common::sql::SortOrder;

use crate::client::{ApiClient, QueryPairs};
use crate::error::ClientError;

/// Album search and filter parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumQuery {
    pub search_term: Option<String>,
    /// `single`, `album`, `compilation` or `all`
    pub type_filter: Option<String>,
    /// `popularity`, `release_date` or `name`
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AlbumQuery {
    fn filters(&self) -> QueryPairs {
        QueryPairs::new()
            .opt("searchTerm", self.search_term.as_deref())
            .opt("typeFilter", self.type_filter.as_deref())
    }

    fn search_pairs(&self) -> QueryPairs {
        self.filters()
            .opt("sortBy", self.sort_by.as_deref())
            .opt("sortOrder", self.sort_order)
            .opt("limit", self.limit)
            .opt("offset", self.offset)
    }
}

pub struct AlbumsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AlbumsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Album>, ClientError> {
        self.client.get(&["albums"], &QueryPairs::new()).await
    }

    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<Album>, ClientError> {
        self.client
            .get(&["albums", "recent"], &QueryPairs::new().opt("limit", limit))
            .await
    }

    pub async fn search(&self, query: &AlbumQuery) -> Result<Vec<Album>, ClientError> {
        self.client.get(&["albums", "search"], &query.search_pairs()).await
    }

    pub async fn type_distribution(
        &self,
        query: &AlbumQuery,
    ) -> Result<Vec<TypeDistribution>, ClientError> {
        self.client
            .get(&["albums", "search", "type-distribution"], &query.filters())
            .await
    }

    pub async fn count(&self, query: &AlbumQuery) -> Result<i64, ClientError> {
        self.client.get(&["albums", "count"], &query.filters()).await
    }

    pub async fn get(&self, id: &str) -> Result<Album, ClientError> {
        self.client
            .get(&["albums", id], &QueryPairs::new())
            .await
    }

    pub async fn tracks(&self, id: &str) -> Result<Vec<Track>, ClientError> {
        self.client
            .get(&["albums", id, "tracks"], &QueryPairs::new())
            .await
    }
}
