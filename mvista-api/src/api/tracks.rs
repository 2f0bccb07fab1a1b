//! /api/tracks handlers

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use mvista_common::models::{SimilarTrack, Track};

use super::params::{QueryParams, DEFAULT_LIMIT};
use super::response::{ok, ApiError, ApiResult, ServiceResultExt};
use crate::services::tracks::{self, TrackSearch, DEFAULT_SIMILAR_LIMIT};
use crate::AppState;

fn track_filters(q: &QueryParams) -> Result<TrackSearch, ApiError> {
    Ok(TrackSearch {
        search_term: q.text("searchTerm"),
        emotion_filter: q.parse("emotionFilter")?.unwrap_or_default(),
        ..Default::default()
    })
}

/// GET /api/tracks
pub async fn all_tracks(State(state): State<AppState>) -> ApiResult<Vec<Track>> {
    ok(tracks::get_tracks(&state.db, &TrackSearch::default())
        .await
        .or_internal("getAllTracks")?)
}

/// GET /api/tracks/search
pub async fn search_tracks(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<Track>> {
    let search = TrackSearch {
        sort_by: q.parse("sortBy")?.unwrap_or_default(),
        sort_order: q.parse("sortOrder")?.unwrap_or_default(),
        limit: Some(q.int("limit")?.unwrap_or(DEFAULT_LIMIT)),
        offset: Some(q.int("offset")?.unwrap_or(0)),
        ..track_filters(&q)?
    };
    ok(tracks::get_tracks(&state.db, &search)
        .await
        .or_internal("searchTracks")?)
}

/// GET /api/tracks/count
pub async fn track_count(State(state): State<AppState>, q: QueryParams) -> ApiResult<i64> {
    ok(tracks::get_track_count(&state.db, &track_filters(&q)?)
        .await
        .or_internal("getTrackCount")?)
}

/// GET /api/tracks/artist/:id
pub async fn tracks_by_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    q: QueryParams,
) -> ApiResult<Vec<Track>> {
    let search = TrackSearch {
        artist_ids: vec![id],
        limit: Some(q.int("limit")?.unwrap_or(DEFAULT_LIMIT)),
        offset: Some(q.int("offset")?.unwrap_or(0)),
        ..Default::default()
    };
    ok(tracks::get_tracks(&state.db, &search)
        .await
        .or_internal("getTracksByArtist")?)
}

/// GET /api/tracks/:id
pub async fn track_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Track> {
    match tracks::get_track(&state.db, &id)
        .await
        .or_internal("getTrackById")?
    {
        Some(track) => ok(track),
        None => Err(ApiError::NotFound("Track not found".to_string())),
    }
}

/// GET /api/tracks/:id/lyrics
///
/// `data` is `null` when the track has no lyrics on record.
pub async fn track_lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<String>> {
    ok(tracks::get_lyrics(&state.db, &id)
        .await
        .or_internal("getLyricsByTrackId")?)
}

/// GET /api/tracks/:id/similar
pub async fn similar_tracks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    q: QueryParams,
) -> ApiResult<Vec<SimilarTrack>> {
    let limit = q.int("limit")?.unwrap_or(DEFAULT_SIMILAR_LIMIT);
    ok(tracks::get_similar_tracks(&state.db, &id, Some(limit))
        .await
        .or_internal("getSimilarTracks")?)
}

/// Build track routes
pub fn track_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tracks", get(all_tracks))
        .route("/api/tracks/search", get(search_tracks))
        .route("/api/tracks/count", get(track_count))
        .route("/api/tracks/artist/:id", get(tracks_by_artist))
        .route("/api/tracks/:id", get(track_by_id))
        .route("/api/tracks/:id/lyrics", get(track_lyrics))
        .route("/api/tracks/:id/similar", get(similar_tracks))
}
