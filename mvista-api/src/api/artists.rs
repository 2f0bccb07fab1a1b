//! /api/artists handlers

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use mvista_common::models::{Album, Artist, EmotionDistribution, GenreDistribution, Track};

use super::params::{QueryParams, DEFAULT_LIMIT};
use super::response::{ok, ApiError, ApiResult, ServiceResultExt};
use crate::services::albums::{self, AlbumSearch};
use crate::services::artists::{self, ArtistSearch, ArtistSort};
use crate::services::tracks::{self, TrackSearch};
use crate::AppState;

/// Name and genre filters shared by search, count and distributions
fn artist_filters(q: &QueryParams) -> ArtistSearch {
    ArtistSearch {
        search_term: q.text("searchTerm"),
        genre_filter: q.text("genreFilter"),
        ..Default::default()
    }
}

fn page(q: &QueryParams) -> Result<(Option<i64>, Option<i64>), ApiError> {
    Ok((
        Some(q.int("limit")?.unwrap_or(DEFAULT_LIMIT)),
        Some(q.int("offset")?.unwrap_or(0)),
    ))
}

/// GET /api/artists/trending
pub async fn trending_artists(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<Artist>> {
    let search = ArtistSearch {
        sort_by: ArtistSort::Popularity,
        limit: Some(q.int("limit")?.unwrap_or(DEFAULT_LIMIT)),
        ..Default::default()
    };
    ok(artists::get_artists(&state.db, &search)
        .await
        .or_internal("getTrendingArtists")?)
}

/// GET /api/artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<Artist>> {
    let (limit, offset) = page(&q)?;
    let search = ArtistSearch {
        sort_by: q.parse("sortBy")?.unwrap_or_default(),
        sort_order: q.parse("sortOrder")?.unwrap_or_default(),
        limit,
        offset,
        ..artist_filters(&q)
    };
    ok(artists::get_artists(&state.db, &search)
        .await
        .or_internal("searchArtists")?)
}

/// GET /api/artists/count
pub async fn artist_count(State(state): State<AppState>, q: QueryParams) -> ApiResult<i64> {
    ok(artists::get_artist_count(&state.db, &artist_filters(&q))
        .await
        .or_internal("getArtistCount")?)
}

/// GET /api/artists/genre-distribution
pub async fn genre_distribution(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<GenreDistribution>> {
    let search = ArtistSearch {
        ids: q.list("ids"),
        ..artist_filters(&q)
    };
    ok(artists::get_genre_distribution(&state.db, &search)
        .await
        .or_internal("getGenreDistribution")?)
}

/// GET /api/artists/emotion-distribution
pub async fn emotion_distribution(
    State(state): State<AppState>,
    q: QueryParams,
) -> ApiResult<Vec<EmotionDistribution>> {
    let search = ArtistSearch {
        ids: q.list("ids"),
        ..artist_filters(&q)
    };
    ok(artists::get_emotion_distribution(&state.db, &search)
        .await
        .or_internal("getEmotionDistribution")?)
}

/// GET /api/artists/genres/count
pub async fn genre_count(State(state): State<AppState>) -> ApiResult<i64> {
    ok(artists::get_genre_count(&state.db)
        .await
        .or_internal("getGenreCount")?)
}

/// GET /api/artists/:id
pub async fn artist_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Artist> {
    match artists::get_artist(&state.db, &id)
        .await
        .or_internal("getArtistById")?
    {
        Some(artist) => ok(artist),
        None => Err(ApiError::NotFound("Artist does not exist".to_string())),
    }
}

/// GET /api/artists/:id/collaborators
pub async fn collaborators(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Artist>> {
    ok(artists::get_collaborators(&state.db, &id)
        .await
        .or_internal("getCollaborators")?)
}

/// GET /api/artists/:id/tracks
pub async fn artist_tracks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    q: QueryParams,
) -> ApiResult<Vec<Track>> {
    let (limit, offset) = page(&q)?;
    let search = TrackSearch {
        artist_ids: vec![id],
        limit,
        offset,
        ..Default::default()
    };
    ok(tracks::get_tracks(&state.db, &search)
        .await
        .or_internal("getTracksByArtist")?)
}

/// GET /api/artists/:id/tracks/count
pub async fn artist_track_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<i64> {
    let search = TrackSearch {
        artist_ids: vec![id],
        ..Default::default()
    };
    ok(tracks::get_track_count(&state.db, &search)
        .await
        .or_internal("getTrackCountByArtist")?)
}

/// GET /api/artists/:id/albums
pub async fn artist_albums(
    State(state): State<AppState>,
    Path(id): Path<String>,
    q: QueryParams,
) -> ApiResult<Vec<Album>> {
    let (limit, offset) = page(&q)?;
    let search = AlbumSearch {
        artist_ids: vec![id],
        limit,
        offset,
        ..Default::default()
    };
    ok(albums::get_albums(&state.db, &search)
        .await
        .or_internal("getAlbumsByArtist")?)
}

/// GET /api/artists/:id/albums/count
pub async fn artist_album_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<i64> {
    let search = AlbumSearch {
        artist_ids: vec![id],
        ..Default::default()
    };
    ok(albums::get_album_count(&state.db, &search)
        .await
        .or_internal("getAlbumCountByArtist")?)
}

/// GET /api/artists/:id/genre-distribution
pub async fn artist_genre_distribution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<GenreDistribution>> {
    ok(artists::get_genre_distribution(&state.db, &ArtistSearch::by_id(&id))
        .await
        .or_internal("getGenreDistributionById")?)
}

/// GET /api/artists/:id/emotion-distribution
pub async fn artist_emotion_distribution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<EmotionDistribution>> {
    ok(artists::get_emotion_distribution(&state.db, &ArtistSearch::by_id(&id))
        .await
        .or_internal("getEmotionDistributionById")?)
}

/// Build artist routes
pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/api/artists/trending", get(trending_artists))
        .route("/api/artists/search", get(search_artists))
        .route("/api/artists/count", get(artist_count))
        .route("/api/artists/genre-distribution", get(genre_distribution))
        .route("/api/artists/emotion-distribution", get(emotion_distribution))
        .route("/api/artists/genres/count", get(genre_count))
        .route("/api/artists/:id", get(artist_by_id))
        .route("/api/artists/:id/collaborators", get(collaborators))
        .route("/api/artists/:id/tracks", get(artist_tracks))
        .route("/api/artists/:id/tracks/count", get(artist_track_count))
        .route("/api/artists/:id/albums", get(artist_albums))
        .route("/api/artists/:id/albums/count", get(artist_album_count))
        .route(
            "/api/artists/:id/genre-distribution",
            get(artist_genre_distribution),
        )
        .route(
            "/api/artists/:id/emotion-distribution",
            get(artist_emotion_distribution),
        )
}
