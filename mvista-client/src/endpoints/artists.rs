//! /artists routes

use mvista_common::models::{Album, Artist, EmotionDistribution, GenreDistribution, Track};
use mvista_common::sql::SortOrder;

use crate::client::{ApiClient, QueryPairs};
use crate::error::ClientError;

/// Artist search and filter parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistQuery {
    pub search_term: Option<String>,
    pub genre_filter: Option<String>,
    /// `popularity`, `name` or `followers`
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ids: Vec<String>,
}

impl ArtistQuery {
    fn filters(&self) -> QueryPairs {
        QueryPairs::new()
            .opt("searchTerm", self.search_term.as_deref())
            .opt("genreFilter", self.genre_filter.as_deref())
    }

    fn search_pairs(&self) -> QueryPairs {
        self.filters()
            .opt("sortBy", self.sort_by.as_deref())
            .opt("sortOrder", self.sort_order)
            .opt("limit", self.limit)
            .opt("offset", self.offset)
    }

    fn distribution_pairs(&self) -> QueryPairs {
        self.filters().list("ids", &self.ids)
    }
}

fn page(limit: Option<i64>, offset: Option<i64>) -> QueryPairs {
    QueryPairs::new().opt("limit", limit).opt("offset", offset)
}

pub struct ArtistsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ArtistsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn trending(&self, limit: Option<i64>) -> Result<Vec<Artist>, ClientError> {
        self.client
            .get(&["artists", "trending"], &QueryPairs::new().opt("limit", limit))
            .await
    }

    pub async fn search(&self, query: &ArtistQuery) -> Result<Vec<Artist>, ClientError> {
        self.client.get(&["artists", "search"], &query.search_pairs()).await
    }

    pub async fn count(&self, query: &ArtistQuery) -> Result<i64, ClientError> {
        self.client.get(&["artists", "count"], &query.filters()).await
    }

    pub async fn genre_distribution(
        &self,
        query: &ArtistQuery,
    ) -> Result<Vec<GenreDistribution>, ClientError> {
        self.client
            .get(&["artists", "genre-distribution"], &query.distribution_pairs())
            .await
    }

    pub async fn emotion_distribution(
        &self,
        query: &ArtistQuery,
    ) -> Result<Vec<EmotionDistribution>, ClientError> {
        self.client
            .get(&["artists", "emotion-distribution"], &query.distribution_pairs())
            .await
    }

    pub async fn genre_count(&self) -> Result<i64, ClientError> {
        self.client.get(&["artists", "genres", "count"], &QueryPairs::new()).await
    }

    pub async fn get(&self, id: &str) -> Result<Artist, ClientError> {
        self.client
            .get(&["artists", id], &QueryPairs::new())
            .await
    }

    pub async fn collaborators(&self, id: &str) -> Result<Vec<Artist>, ClientError> {
        self.client
            .get(&["artists", id, "collaborators"], &QueryPairs::new())
            .await
    }

    pub async fn tracks(
        &self,
        id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Track>, ClientError> {
        self.client
            .get(&["artists", id, "tracks"], &page(limit, offset))
            .await
    }

    pub async fn track_count(&self, id: &str) -> Result<i64, ClientError> {
        self.client
            .get(&["artists", id, "tracks", "count"], &QueryPairs::new())
            .await
    }

    pub async fn albums(
        &self,
        id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Album>, ClientError> {
        self.client
            .get(&["artists", id, "albums"], &page(limit, offset))
            .await
    }

    pub async fn album_count(&self, id: &str) -> Result<i64, ClientError> {
        self.client
            .get(&["artists", id, "albums", "count"], &QueryPairs::new())
            .await
    }

    /// Genre distribution of a single artist
    pub async fn genre_distribution_of(
        &self,
        id: &str,
    ) -> Result<Vec<GenreDistribution>, ClientError> {
        self.client
            .get(&["artists", id, "genre-distribution"], &QueryPairs::new())
            .await
    }

    /// Emotion distribution of a single artist's tracks
    pub async fn emotion_distribution_of(
        &self,
        id: &str,
    ) -> Result<Vec<EmotionDistribution>, ClientError> {
        self.client
            .get(
                &["artists", id, "emotion-distribution"],
                &QueryPairs::new(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pairs_only_present_values() {
        let query = ArtistQuery {
            search_term: Some("mariya".into()),
            genre_filter: Some(String::new()),
            sort_order: Some(SortOrder::Asc),
            limit: Some(12),
            ..Default::default()
        };
        assert_eq!(
            query.search_pairs().pairs(),
            &[
                ("searchTerm", "mariya".to_string()),
                ("sortOrder", "ASC".to_string()),
                ("limit", "12".to_string()),
            ]
        );
    }

    #[test]
    fn test_distribution_pairs_repeat_ids() {
        let query = ArtistQuery {
            ids: vec!["a1".into(), "a2".into()],
            ..Default::default()
        };
        assert_eq!(
            query.distribution_pairs().pairs(),
            &[("ids", "a1".to_string()), ("ids", "a2".to_string())]
        );
    }
}
