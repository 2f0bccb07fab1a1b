//! Track queries: search, lyrics, similarity ranking

use std::fmt;
use std::str::FromStr;

use mvista_common::emotion::EmotionFilter;
use mvista_common::models::{SimilarTrack, Track};
use mvista_common::sql::{like_pattern, BuiltQuery, SortOrder, SqlBuilder};
use mvista_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::shared::{artist_columns, credited_artists_sql, flag_column, non_empty};

/// Default number of similar tracks returned
pub const DEFAULT_SIMILAR_LIMIT: i64 = 3;

const TRACK_COLUMNS: &str = "t.id, t.name, t.album_id, al.name AS album_name, al.release_date, \
     t.disc_num, t.track_num, t.duration_ms, t.explicit, t.danceability, t.energy, t.key, \
     t.loudness, t.mode, t.speechiness, t.acousticness, t.instrumentalness, t.liveness, \
     t.valence, t.tempo, t.time_signature";

/// Track orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackSort {
    #[default]
    ReleaseDate,
    Name,
    DurationMs,
    /// Disc then track number
    Position,
}

impl TrackSort {
    fn order_by(self, order: SortOrder) -> String {
        let dir = order.as_sql();
        match self {
            TrackSort::ReleaseDate => format!("al.release_date {dir}"),
            TrackSort::Name => format!("t.name {dir}"),
            TrackSort::DurationMs => format!("t.duration_ms {dir}"),
            TrackSort::Position => format!("t.disc_num {dir}, t.track_num {dir}"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrackSort::ReleaseDate => "release_date",
            TrackSort::Name => "name",
            TrackSort::DurationMs => "duration_ms",
            TrackSort::Position => "track_num",
        }
    }
}

impl fmt::Display for TrackSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackSort {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "release_date" => Ok(TrackSort::ReleaseDate),
            "name" => Ok(TrackSort::Name),
            "duration_ms" => Ok(TrackSort::DurationMs),
            "track_num" | "position" => Ok(TrackSort::Position),
            other => Err(Error::InvalidInput(format!("unknown track sort: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSearch {
    pub search_term: Option<String>,
    pub emotion_filter: EmotionFilter,
    pub sort_by: TrackSort,
    pub sort_order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ids: Vec<String>,
    pub album_ids: Vec<String>,
    /// Tracks credited to any of these artists
    pub artist_ids: Vec<String>,
}

impl TrackSearch {
    pub fn by_id(id: &str) -> Self {
        Self {
            ids: vec![id.to_string()],
            ..Default::default()
        }
    }
}

fn push_filters(b: &mut SqlBuilder, search: &TrackSearch) {
    if let Some(term) = non_empty(&search.search_term) {
        let p = b.bind(like_pattern(term));
        b.push(&format!(" AND t.name LIKE {p}"));
    }
    if let EmotionFilter::Only(emotion) = search.emotion_filter {
        let predicate = emotion.push_predicate(b, "t.energy", "t.valence");
        b.push(&format!(" AND ({predicate})"));
    }
    if !search.ids.is_empty() {
        let list = b.bind_list(&search.ids);
        b.push(&format!(" AND t.id IN ({list})"));
    }
    if !search.album_ids.is_empty() {
        let list = b.bind_list(&search.album_ids);
        b.push(&format!(" AND t.album_id IN ({list})"));
    }
    if !search.artist_ids.is_empty() {
        let list = b.bind_list(&search.artist_ids);
        b.push(&format!(
            " AND t.id IN (SELECT track_id FROM track_artist WHERE artist_id IN ({list}))"
        ));
    }
}

pub fn build_tracks_query(search: &TrackSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(&format!(
        "SELECT {TRACK_COLUMNS}, {} AS artists \
         FROM track t LEFT JOIN album al ON al.id = t.album_id WHERE 1 = 1",
        credited_artists_sql("track_artist", "track_id", "t.id")
    ));
    push_filters(&mut b, search);
    b.push(&format!(
        " ORDER BY {}, t.id",
        search.sort_by.order_by(search.sort_order)
    ));
    b.push_page(search.limit, search.offset);
    b.finish()
}

pub fn build_track_count_query(search: &TrackSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push("SELECT COUNT(*) AS count FROM track t WHERE 1 = 1");
    push_filters(&mut b, search);
    b.finish()
}

pub fn build_lyrics_query(track_id: &str) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    let id = b.bind(track_id);
    b.push(&format!("SELECT lyrics FROM track_lyrics WHERE track_id = {id}"));
    b.finish()
}

/// Other tracks ranked by `-(Δenergy² + Δvalence²) / 2`, best first.
///
/// Only the best-scoring track of each name is kept. Yields no rows when the
/// reference track is unknown or lacks audio features.
pub fn build_similar_tracks_query(track_id: &str, limit: Option<i64>) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    let id = b.bind(track_id);
    b.push(&format!(
        "WITH the_track AS (\
         SELECT energy, valence FROM track \
         WHERE id = {id} AND energy IS NOT NULL AND valence IS NOT NULL), \
         ranked AS (\
         SELECT t.id, t.name, t.album_id, al.name AS album_name, t.duration_ms, t.explicit, \
         -((t.energy - tt.energy) * (t.energy - tt.energy) \
         + (t.valence - tt.valence) * (t.valence - tt.valence)) / 2.0 AS similarity \
         FROM track t CROSS JOIN the_track tt \
         LEFT JOIN album al ON al.id = t.album_id \
         WHERE t.id <> {id} AND t.energy IS NOT NULL AND t.valence IS NOT NULL), \
         best AS (\
         SELECT r.*, ROW_NUMBER() OVER (PARTITION BY r.name ORDER BY r.similarity DESC, r.id) AS rn \
         FROM ranked r) \
         SELECT s.id, s.name, s.album_id, s.album_name, s.duration_ms, s.explicit, s.similarity, \
         {} AS artists \
         FROM best s WHERE s.rn = 1 \
         ORDER BY s.similarity DESC, s.id",
        credited_artists_sql("track_artist", "track_id", "s.id")
    ));
    b.push_page(limit, None);
    b.finish()
}

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    let (artist_ids, artist_names) = artist_columns(row, "artists")?;
    Ok(Track {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        album_id: row.try_get("album_id")?,
        album_name: row.try_get("album_name")?,
        release_date: row.try_get("release_date")?,
        artist_ids,
        artist_names,
        disc_num: row.try_get("disc_num")?,
        track_num: row.try_get("track_num")?,
        duration_ms: row.try_get("duration_ms")?,
        explicit: flag_column(row, "explicit")?,
        danceability: row.try_get("danceability")?,
        energy: row.try_get("energy")?,
        key: row.try_get("key")?,
        loudness: row.try_get("loudness")?,
        mode: row.try_get("mode")?,
        speechiness: row.try_get("speechiness")?,
        acousticness: row.try_get("acousticness")?,
        instrumentalness: row.try_get("instrumentalness")?,
        liveness: row.try_get("liveness")?,
        valence: row.try_get("valence")?,
        tempo: row.try_get("tempo")?,
        time_signature: row.try_get("time_signature")?,
    })
}

fn similar_from_row(row: &SqliteRow) -> Result<SimilarTrack> {
    let (artist_ids, artist_names) = artist_columns(row, "artists")?;
    Ok(SimilarTrack {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        album_id: row.try_get("album_id")?,
        album_name: row.try_get("album_name")?,
        duration_ms: row.try_get("duration_ms")?,
        explicit: flag_column(row, "explicit")?,
        artist_ids,
        artist_names,
        similarity: row.try_get("similarity")?,
    })
}

pub async fn get_tracks(pool: &SqlitePool, search: &TrackSearch) -> Result<Vec<Track>> {
    let rows = build_tracks_query(search).fetch_all(pool).await?;
    rows.iter().map(track_from_row).collect()
}

pub async fn get_track(pool: &SqlitePool, id: &str) -> Result<Option<Track>> {
    Ok(get_tracks(pool, &TrackSearch::by_id(id))
        .await?
        .into_iter()
        .next())
}

pub async fn get_track_count(pool: &SqlitePool, search: &TrackSearch) -> Result<i64> {
    let row = build_track_count_query(search).fetch_one(pool).await?;
    Ok(row.try_get("count")?)
}

/// Lyrics of a track; `None` when the track has none on record
pub async fn get_lyrics(pool: &SqlitePool, track_id: &str) -> Result<Option<String>> {
    match build_lyrics_query(track_id).fetch_optional(pool).await? {
        Some(row) => Ok(row.try_get("lyrics")?),
        None => Ok(None),
    }
}

pub async fn get_similar_tracks(
    pool: &SqlitePool,
    track_id: &str,
    limit: Option<i64>,
) -> Result<Vec<SimilarTrack>> {
    let rows = build_similar_tracks_query(track_id, limit)
        .fetch_all(pool)
        .await?;
    rows.iter().map(similar_from_row).collect()
}

/// Tracks of an album in disc/track order
pub async fn get_tracks_by_album(pool: &SqlitePool, album_id: &str) -> Result<Vec<Track>> {
    let search = TrackSearch {
        album_ids: vec![album_id.to_string()],
        sort_by: TrackSort::Position,
        sort_order: SortOrder::Asc,
        ..Default::default()
    };
    get_tracks(pool, &search).await
}
