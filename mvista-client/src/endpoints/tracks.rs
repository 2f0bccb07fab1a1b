//! /tracks routes

use mvista_common::emotion::EmotionFilter;
use mvista_common::models::{SimilarTrack, Track};
use mvista_common::sql::SortOrder;

use crate::client::{ApiClient, QueryPairs};
use crate::error::ClientError;

/// Track search and filter parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackQuery {
    pub search_term: Option<String>,
    pub emotion_filter: Option<EmotionFilter>,
    /// `release_date`, `name` or `duration_ms`
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TrackQuery {
    fn filters(&self) -> QueryPairs {
        QueryPairs::new()
            .opt("searchTerm", self.search_term.as_deref())
            .opt("emotionFilter", self.emotion_filter)
    }

    fn search_pairs(&self) -> QueryPairs {
        self.filters()
            .opt("sortBy", self.sort_by.as_deref())
            .opt("sortOrder", self.sort_order)
            .opt("limit", self.limit)
            .opt("offset", self.offset)
    }
}

pub struct TracksApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TracksApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Track>, ClientError> {
        self.client.get(&["tracks"], &QueryPairs::new()).await
    }

    pub async fn search(&self, query: &TrackQuery) -> Result<Vec<Track>, ClientError> {
        self.client.get(&["tracks", "search"], &query.search_pairs()).await
    }

    pub async fn count(&self, query: &TrackQuery) -> Result<i64, ClientError> {
        self.client.get(&["tracks", "count"], &query.filters()).await
    }

    pub async fn by_artist(
        &self,
        artist_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Track>, ClientError> {
        let query = QueryPairs::new().opt("limit", limit).opt("offset", offset);
        self.client
            .get(&["tracks", "artist", artist_id], &query)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Track, ClientError> {
        self.client
            .get(&["tracks", id], &QueryPairs::new())
            .await
    }

    /// Lyrics text; `None` when the track has none
    pub async fn lyrics(&self, id: &str) -> Result<Option<String>, ClientError> {
        self.client
            .get(&["tracks", id, "lyrics"], &QueryPairs::new())
            .await
    }

    pub async fn similar(
        &self,
        id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<SimilarTrack>, ClientError> {
        self.client
            .get(
                &["tracks", id, "similar"],
                &QueryPairs::new().opt("limit", limit),
            )
            .await
    }
}
