//! /api/albums handlers

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use mvista_common::models::{Album, Track, TypeDistribution};
use mvista_common::sql::SortOrder;

use super::params::{QueryParams, DEFAULT_LIMIT};
use super::response::{ok, ApiError, ApiResult, ServiceResultExt};
use crate::services::albums::{self, AlbumSearch, AlbumSort};
use crate::services::tracks;
use crate::AppState;

fn album_filters(q: &QueryParams) -> Result<AlbumSearch, ApiError> {
    Ok(AlbumSearch {
        search_term: q.text("searchTerm"),
        type_filter: q.parse("typeFilter")?.unwrap_or_default(),
        ..Default::default()
    })
}

/// GET /api/albums
pub async fn all_albums(State(state): State<AppState>) -> ApiResult<Vec<Album>> {
    ok(albums::get_albums(&state.db, &AlbumSearch::default())
        .await
        .or_internal("getAllAlbums")?)
}

/// GET /api/albums/recent
pub async fn recent_albums(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<Album>> {
    let search = AlbumSearch {
        sort_by: AlbumSort::ReleaseDate,
        sort_order: SortOrder::Desc,
        limit: Some(q.int("limit")?.unwrap_or(DEFAULT_LIMIT)),
        ..Default::default()
    };
    ok(albums::get_albums(&state.db, &search)
        .await
        .or_internal("getRecentAlbums")?)
}

/// GET /api/albums/search
pub async fn search_albums(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<Album>> {
    let search = AlbumSearch {
        sort_by: q.parse("sortBy")?.unwrap_or_default(),
        sort_order: q.parse("sortOrder")?.unwrap_or_default(),
        limit: Some(q.int("limit")?.unwrap_or(DEFAULT_LIMIT)),
        offset: Some(q.int("offset")?.unwrap_or(0)),
        ..album_filters(&q)?
    };
    ok(albums::get_albums(&state.db, &search)
        .await
        .or_internal("searchAlbums")?)
}

/// GET /api/albums/search/type-distribution
pub async fn type_distribution(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<TypeDistribution>> {
    ok(albums::get_type_distribution(&state.db, &album_filters(&q)?)
        .await
        .or_internal("getTypeDistributionFromSearch")?)
}

/// GET /api/albums/count
pub async fn album_count(State(state): State<AppState>, q: QueryParams) -> ApiResult<i64> {
    ok(albums::get_album_count(&state.db, &album_filters(&q)?)
        .await
        .or_internal("getAlbumCount")?)
}

/// GET /api/albums/:id
pub async fn album_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Album> {
    match albums::get_album(&state.db, &id)
        .await
        .or_internal("getAlbumById")?
    {
        Some(album) => ok(album),
        None => Err(ApiError::NotFound("Album does not exist".to_string())),
    }
}

/// GET /api/albums/:id/tracks
pub async fn album_tracks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Track>> {
    ok(tracks::get_tracks_by_album(&state.db, &id)
        .await
        .or_internal("getTracksByAlbum")?)
}

/// Build album routes
pub fn album_routes() -> Router<AppState> {
    Router::new()
        .route("/api/albums", get(all_albums))
        .route("/api/albums/recent", get(recent_albums))
        .route("/api/albums/search", get(search_albums))
        .route("/api/albums/search/type-distribution", get(type_distribution))
        .route("/api/albums/count", get(album_count))
        .route("/api/albums/:id", get(album_by_id))
        .route("/api/albums/:id/tracks", get(album_tracks))
}
