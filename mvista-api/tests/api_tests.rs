//! Router tests against a seeded in-memory catalog

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mvista_api::{build_router, AppState};
use mvista_common::db::init_memory_database;
use serde_json::Value;
use tower::ServiceExt;

const CATALOG: &str = include_str!("fixtures/catalog.sql");

async fn test_app() -> Router {
    app_with_origins(&["http://localhost:5173".to_string()]).await
}

async fn app_with_origins(origins: &[String]) -> Router {
    let pool = init_memory_database().await.unwrap();
    sqlx::raw_sql(CATALOG).execute(&pool).await.unwrap();
    let state = AppState::new(pool, "test");
    build_router(state, origins)
}

/// CORS response headers (allow-origin, allow-credentials) for a GET from `origin`
async fn cors_headers(app: Router, origin: &str) -> (Option<String>, Option<String>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    };
    (
        value(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        value(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
    )
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = test_app()
        .await
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// GET that must succeed; returns the envelope's `data`
async fn data(uri: &str) -> Value {
    let (status, json) = get(uri).await;
    assert_eq!(status, StatusCode::OK, "{} -> {}", uri, json);
    assert_eq!(json["success"], true);
    assert!(json["timestamp"].is_string());
    json["data"].clone()
}

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect()
}

fn approx(value: &Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 1e-6
}

// ========================================
// Service routes
// ========================================

#[tokio::test]
async fn test_health_reports_environment() {
    let (status, json) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["environment"], "test");
    assert!(json["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_service_info_lists_endpoints() {
    let (status, json) = get("/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["endpoints"]["tracks"], "/api/tracks");
    assert_eq!(json["endpoints"]["insights"], "/api/insights");
}

#[tokio::test]
async fn test_cors_listed_origin_allows_credentials() {
    let (origin, credentials) = cors_headers(test_app().await, "http://localhost:5173").await;
    assert_eq!(origin.as_deref(), Some("http://localhost:5173"));
    assert_eq!(credentials.as_deref(), Some("true"));

    let (origin, _) = cors_headers(test_app().await, "https://elsewhere.example").await;
    assert_eq!(origin, None);
}

#[tokio::test]
async fn test_cors_wildcard_origin_allows_any_without_credentials() {
    let app = app_with_origins(&["*".to_string()]).await;
    let (origin, credentials) = cors_headers(app, "https://elsewhere.example").await;
    assert_eq!(origin.as_deref(), Some("*"));
    assert_eq!(credentials, None);
}

#[tokio::test]
async fn test_unknown_route_is_404_envelope() {
    let (status, json) = get("/api/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Route /api/nowhere not found");
}

// ========================================
// Artists
// ========================================

#[tokio::test]
async fn test_trending_artists_by_popularity() {
    let artists = data("/api/artists/trending?limit=2").await;
    assert_eq!(ids(&artists), vec!["ar1", "ar2"]);
}

#[tokio::test]
async fn test_search_artists_defaults() {
    let artists = data("/api/artists/search").await;
    assert_eq!(ids(&artists), vec!["ar1", "ar2", "ar3", "ar4", "ar5"]);
}

#[tokio::test]
async fn test_search_artists_genre_filter_keeps_all_genres() {
    let artists = data("/api/artists/search?genreFilter=rock&sortBy=name&sortOrder=asc").await;
    assert_eq!(ids(&artists), vec!["ar3", "ar4"]);
    assert_eq!(artists[1]["genres"], serde_json::json!(["ambient", "rock"]));
}

#[tokio::test]
async fn test_search_artists_empty_term_is_ignored() {
    let artists = data("/api/artists/search?searchTerm=&limit=3&offset=1").await;
    assert_eq!(ids(&artists), vec!["ar2", "ar3", "ar4"]);
}

#[tokio::test]
async fn test_artist_count_with_filters() {
    assert_eq!(data("/api/artists/count").await, 5);
    assert_eq!(data("/api/artists/count?genreFilter=pop").await, 2);
    assert_eq!(data("/api/artists/count?searchTerm=blue").await, 1);
}

#[tokio::test]
async fn test_genre_count() {
    assert_eq!(data("/api/artists/genres/count").await, 4);
}

#[tokio::test]
async fn test_genre_distribution() {
    let dist = data("/api/artists/genre-distribution").await;
    let genres: Vec<&str> = dist
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["genre"].as_str().unwrap())
        .collect();
    assert_eq!(genres, vec!["city pop", "rock", "ambient", "japanese pop"]);
    assert_eq!(dist[0]["artist_num"], 2);
    assert!(approx(&dist[0]["ratio"], 2.0 / 6.0));

    let pop = data("/api/artists/genre-distribution?genreFilter=pop").await;
    assert_eq!(pop.as_array().unwrap().len(), 2);
    assert!(approx(&pop[0]["ratio"], 2.0 / 3.0));
}

#[tokio::test]
async fn test_emotion_distribution() {
    let dist = data("/api/artists/emotion-distribution").await;
    let emotions: Vec<(&str, i64)> = dist
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["emotion"].as_str().unwrap(), e["track_num"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        emotions,
        vec![
            ("Cheerful", 3),
            ("Bleak", 2),
            ("Frantic", 2),
            ("Calm", 1),
            ("Other", 1)
        ]
    );
    assert!(approx(&dist[0]["ratio"], 3.0 / 9.0));

    let by_ids = data("/api/artists/emotion-distribution?ids=ar3").await;
    assert_eq!(by_ids[0]["emotion"], "Frantic");
    assert!(approx(&by_ids[0]["ratio"], 1.0));
}

#[tokio::test]
async fn test_artist_by_id() {
    let artist = data("/api/artists/ar1").await;
    assert_eq!(artist["name"], "Mariya Takeuchi");
    assert_eq!(artist["genres"], serde_json::json!(["city pop", "japanese pop"]));
    assert_eq!(
        artist["urls"],
        serde_json::json!(["img/ar1-large", "img/ar1-small"])
    );
    assert!(artist.get("collab_num").is_none());

    let plain = data("/api/artists/ar5").await;
    assert_eq!(plain["genres"], serde_json::json!([]));
    assert_eq!(plain["urls"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_artist_is_404() {
    let (status, json) = get("/api/artists/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Artist does not exist");
}

#[tokio::test]
async fn test_collaborators() {
    let collabs = data("/api/artists/ar1/collaborators").await;
    assert_eq!(ids(&collabs), vec!["ar2"]);
    assert_eq!(collabs[0]["collab_num"], 1);

    assert_eq!(data("/api/artists/ar5/collaborators").await, serde_json::json!([]));
}

#[tokio::test]
async fn test_artist_tracks_and_count() {
    let tracks = data("/api/artists/ar1/tracks").await;
    assert_eq!(ids(&tracks), vec!["t1", "t2", "t3"]);
    assert_eq!(data("/api/artists/ar1/tracks/count").await, 3);
    assert_eq!(data("/api/artists/ar5/tracks/count").await, 0);
}

#[tokio::test]
async fn test_artist_albums_and_count() {
    let albums = data("/api/artists/ar1/albums?limit=2").await;
    assert_eq!(ids(&albums), vec!["al2", "al3"]);
    assert_eq!(data("/api/artists/ar1/albums/count").await, 3);
}

#[tokio::test]
async fn test_artist_distributions_by_id() {
    let genres = data("/api/artists/ar4/genre-distribution").await;
    assert_eq!(genres.as_array().unwrap().len(), 2);
    assert!(approx(&genres[0]["ratio"], 0.5));

    let emotions = data("/api/artists/ar1/emotion-distribution").await;
    assert_eq!(emotions.as_array().unwrap().len(), 1);
    assert_eq!(emotions[0]["emotion"], "Cheerful");
}

#[tokio::test]
async fn test_bad_artist_parameters_are_400() {
    for uri in [
        "/api/artists/search?limit=ten",
        "/api/artists/search?sortBy=age",
        "/api/artists/search?sortOrder=sideways",
    ] {
        let (status, json) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }
}

// ========================================
// Albums
// ========================================

#[tokio::test]
async fn test_all_albums() {
    let albums = data("/api/albums").await;
    assert_eq!(ids(&albums), vec!["al5", "al2", "al3", "al1", "al4", "al6"]);
}

#[tokio::test]
async fn test_recent_albums() {
    let albums = data("/api/albums/recent?limit=2").await;
    assert_eq!(ids(&albums), vec!["al5", "al4"]);
}

#[tokio::test]
async fn test_search_albums() {
    let singles = data("/api/albums/search?typeFilter=single").await;
    assert_eq!(ids(&singles), vec!["al2"]);
    assert_eq!(singles[0]["type"], "single");
    assert_eq!(singles[0]["urls"], serde_json::json!(["img/al2-300"]));

    let named = data("/api/albums/search?searchTerm=static&sortBy=release_date&sortOrder=asc").await;
    assert_eq!(ids(&named), vec!["al4", "al5"]);
}

#[tokio::test]
async fn test_album_type_distribution() {
    let dist = data("/api/albums/search/type-distribution").await;
    let rows: Vec<(&str, i64)> = dist
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["type"].as_str().unwrap(), r["count"].as_i64().unwrap()))
        .collect();
    assert_eq!(rows, vec![("album", 4), ("compilation", 1), ("single", 1)]);
    assert!(approx(&dist[0]["ratio"], 4.0 / 6.0));
}

#[tokio::test]
async fn test_album_count() {
    assert_eq!(data("/api/albums/count").await, 6);
    assert_eq!(data("/api/albums/count?typeFilter=album").await, 4);
    assert_eq!(data("/api/albums/count?typeFilter=all&searchTerm=static").await, 2);
}

#[tokio::test]
async fn test_album_by_id_lists_credited_artists_in_order() {
    let album = data("/api/albums/al3").await;
    assert_eq!(album["artist_ids"], serde_json::json!(["ar2", "ar1"]));
    assert_eq!(
        album["artist_names"],
        serde_json::json!(["Tatsuro Yamashita", "Mariya Takeuchi"])
    );

    let (status, json) = get("/api/albums/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Album does not exist");
}

#[tokio::test]
async fn test_album_tracks_in_disc_order() {
    let tracks = data("/api/albums/al6/tracks").await;
    assert_eq!(ids(&tracks), vec!["t6", "t7", "t8", "t9"]);
}

#[tokio::test]
async fn test_bad_album_type_is_400() {
    let (status, _) = get("/api/albums/search?typeFilter=ep").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========================================
// Tracks
// ========================================

#[tokio::test]
async fn test_all_tracks() {
    let tracks = data("/api/tracks").await;
    assert_eq!(tracks.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_search_tracks_by_emotion() {
    let cheerful = data("/api/tracks/search?emotionFilter=Cheerful").await;
    assert_eq!(ids(&cheerful), vec!["t1", "t2", "t3"]);

    let other = data("/api/tracks/search?emotionFilter=Other").await;
    assert_eq!(ids(&other), vec!["t8"]);

    let none = data("/api/tracks/search?emotionFilter=Euphotic").await;
    assert_eq!(none, serde_json::json!([]));
}

#[tokio::test]
async fn test_track_count() {
    assert_eq!(data("/api/tracks/count").await, 9);
    assert_eq!(data("/api/tracks/count?emotionFilter=Bleak").await, 2);
    assert_eq!(data("/api/tracks/count?emotionFilter=All&searchTerm=static").await, 2);
}

#[tokio::test]
async fn test_bad_track_parameters_are_400() {
    for uri in [
        "/api/tracks/search?emotionFilter=Joyful",
        "/api/tracks/search?sortBy=popularity",
        "/api/tracks/search?offset=-x",
    ] {
        let (status, json) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn test_tracks_by_artist() {
    let tracks = data("/api/tracks/artist/ar3?limit=1").await;
    assert_eq!(ids(&tracks), vec!["t5"]);
}

#[tokio::test]
async fn test_track_by_id() {
    let track = data("/api/tracks/t3").await;
    assert_eq!(track["album_name"], "For You");
    assert_eq!(track["release_date"], "1982-01-21");
    assert_eq!(track["artist_ids"], serde_json::json!(["ar2", "ar1"]));
    assert_eq!(track["explicit"], false);

    assert_eq!(data("/api/tracks/t4").await["explicit"], true);
    assert!(data("/api/tracks/t8").await["energy"].is_null());

    let (status, json) = get("/api/tracks/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Track not found");
}

#[tokio::test]
async fn test_track_lyrics() {
    assert_eq!(
        data("/api/tracks/t2/lyrics").await,
        "Sunny sunday city lights, sunny skies"
    );
    assert!(data("/api/tracks/t5/lyrics").await.is_null());
    assert!(data("/api/tracks/missing/lyrics").await.is_null());
}

#[tokio::test]
async fn test_similar_tracks() {
    let similar = data("/api/tracks/t1/similar").await;
    assert_eq!(ids(&similar), vec!["t2", "t3", "t9"]);
    assert!(approx(&similar[0]["similarity"], -0.00625));

    // One row per name: t7 beats t6 for "Fields"
    let all = data("/api/tracks/t1/similar?limit=10").await;
    assert_eq!(ids(&all), vec!["t2", "t3", "t9", "t7", "t5", "t4"]);
}

#[tokio::test]
async fn test_similar_tracks_without_features_is_empty() {
    assert_eq!(data("/api/tracks/t8/similar").await, serde_json::json!([]));
    assert_eq!(data("/api/tracks/missing/similar").await, serde_json::json!([]));
}

// ========================================
// Insights
// ========================================

#[tokio::test]
async fn test_love_distribution() {
    let dist = data("/api/insights/love-distribution").await;
    let rows: Vec<(&str, i64)> = dist
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["emotion"].as_str().unwrap(), r["cnt"].as_i64().unwrap()))
        .collect();
    assert_eq!(rows, vec![("Cheerful", 4), ("Other", 2), ("Frantic", 1)]);
    assert!(approx(&dist[0]["ratio"], 4.0 / 7.0));
}

#[tokio::test]
async fn test_pop_words() {
    let words = data("/api/insights/pop-words").await;
    let top: Vec<(&str, i64)> = words
        .as_array()
        .unwrap()
        .iter()
        .take(4)
        .map(|w| (w["word"].as_str().unwrap(), w["cnt"].as_i64().unwrap()))
        .collect();
    assert_eq!(top, vec![("love", 4), ("city", 3), ("lights", 2), ("sunny", 2)]);
    assert!(words
        .as_array()
        .unwrap()
        .iter()
        .all(|w| w["word"] != "the" && w["word"] != "is"));
}

#[tokio::test]
async fn test_artist_popularity_growth() {
    let growth = data("/api/insights/artist-popularity-growth").await;
    let rows = growth.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["artist_id"], "ar3");
    assert_eq!(rows[0]["prev_album_id"], "al4");
    assert_eq!(rows[0]["curr_album_id"], "al5");
    assert!(approx(&rows[0]["popularity_growth_ratio"], 125.0));
    assert_eq!(rows[1]["artist_id"], "ar1");
    assert_eq!(rows[1]["prev_album"], "Variety");
    assert!(approx(&rows[1]["popularity_growth_ratio"], 70.0));
}

#[tokio::test]
async fn test_artist_emotion_variety() {
    let variety = data("/api/insights/artist-emotion-variety").await;
    assert_eq!(ids(&variety), vec!["ar4", "ar1", "ar3", "ar2"]);
    assert!(approx(&variety[1]["variety"], 0.025 / 3.0));
    assert!(approx(&variety[3]["variety"], 0.0));
}
