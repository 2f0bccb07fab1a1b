//! /insights routes

use mvista_common::models::{ArtistEmotionVariety, ArtistGrowth, LoveDistribution, WordCount};

use crate::client::{ApiClient, QueryPairs};
use crate::error::ClientError;

pub struct InsightsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InsightsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn love_distribution(&self) -> Result<Vec<LoveDistribution>, ClientError> {
        self.client
            .get(&["insights", "love-distribution"], &QueryPairs::new())
            .await
    }

    pub async fn pop_words(&self) -> Result<Vec<WordCount>, ClientError> {
        self.client.get(&["insights", "pop-words"], &QueryPairs::new()).await
    }

    pub async fn artist_popularity_growth(&self) -> Result<Vec<ArtistGrowth>, ClientError> {
        self.client
            .get(&["insights", "artist-popularity-growth"], &QueryPairs::new())
            .await
    }

    pub async fn artist_emotion_variety(
        &self,
    ) -> Result<Vec<ArtistEmotionVariety>, ClientError> {
        self.client
            .get(&["insights", "artist-emotion-variety"], &QueryPairs::new())
            .await
    }
}
