//! /api/insights handlers

use axum::{extract::State, routing::get, Router};
use mvista_common::models::{ArtistEmotionVariety, ArtistGrowth, LoveDistribution, WordCount};

use super::response::{ok, ApiResult, ServiceResultExt};
use crate::services::insights::{self, GROWTH_LIMIT, VARIETY_LIMIT};
use crate::AppState;

pub async fn love_distribution(State(state): State<AppState>) -> ApiResult<Vec<LoveDistribution>> {
    ok(insights::get_love_distribution(&state.db)
        .await
        .or_internal("getLoveDistribution")?)
}

pub async fn pop_words(State(state): State<AppState>) -> ApiResult<Vec<WordCount>> {
    ok(insights::get_pop_words(&state.db)
        .await
        .or_internal("getPopWords")?)
}

pub async fn artist_popularity_growth(
    State(state): State<AppState>,
) -> ApiResult<Vec<ArtistGrowth>> {
    ok(insights::get_popularity_growth(&state.db, GROWTH_LIMIT)
        .await
        .or_internal("getArtistPopularityGrowth")?)
}

pub async fn artist_emotion_variety(
    State(state): State<AppState>,
) -> ApiResult<Vec<ArtistEmotionVariety>> {
    ok(insights::get_emotion_variety(&state.db, VARIETY_LIMIT)
        .await
        .or_internal("getArtistEmotionVariety")?)
}

/// Build insight routes
pub fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/insights/love-distribution", get(love_distribution))
        .route("/api/insights/pop-words", get(pop_words))
        .route(
            "/api/insights/artist-popularity-growth",
            get(artist_popularity_growth),
        )
        .route(
            "/api/insights/artist-emotion-variety",
            get(artist_emotion_variety),
        )
}
