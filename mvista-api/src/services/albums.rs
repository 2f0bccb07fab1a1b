//! Album queries

use std::fmt;
use std::str::FromStr;

use mvista_common::models::{Album, TypeDistribution};
use mvista_common::sql::{like_pattern, BuiltQuery, SortOrder, SqlBuilder};
use mvista_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::shared::{album_images_sql, artist_columns, credited_artists_sql, json_column, non_empty};

/// Sortable album columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumSort {
    #[default]
    Popularity,
    ReleaseDate,
    Name,
}

impl AlbumSort {
    fn column(self) -> &'static str {
        match self {
            AlbumSort::Popularity => "al.popularity",
            AlbumSort::ReleaseDate => "al.release_date",
            AlbumSort::Name => "al.name",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlbumSort::Popularity => "popularity",
            AlbumSort::ReleaseDate => "release_date",
            AlbumSort::Name => "name",
        }
    }
}

impl fmt::Display for AlbumSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlbumSort {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "popularity" => Ok(AlbumSort::Popularity),
            "release_date" => Ok(AlbumSort::ReleaseDate),
            "name" => Ok(AlbumSort::Name),
            other => Err(Error::InvalidInput(format!("unknown album sort: {}", other))),
        }
    }
}

/// Album type restriction; `All` adds no condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumTypeFilter {
    #[default]
    All,
    Single,
    Album,
    Compilation,
}

impl AlbumTypeFilter {
    /// Stored `album.type` value, `None` for `All`
    pub fn db_value(self) -> Option<&'static str> {
        match self {
            AlbumTypeFilter::All => None,
            AlbumTypeFilter::Single => Some("single"),
            AlbumTypeFilter::Album => Some("album"),
            AlbumTypeFilter::Compilation => Some("compilation"),
        }
    }
}

impl fmt::Display for AlbumTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_value().unwrap_or("all"))
    }
}

impl FromStr for AlbumTypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(AlbumTypeFilter::All),
            "single" => Ok(AlbumTypeFilter::Single),
            "album" => Ok(AlbumTypeFilter::Album),
            "compilation" => Ok(AlbumTypeFilter::Compilation),
            _ => Err(Error::InvalidInput(format!("unknown album type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumSearch {
    pub search_term: Option<String>,
    pub type_filter: AlbumTypeFilter,
    pub sort_by: AlbumSort,
    pub sort_order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ids: Vec<String>,
    /// Albums credited to any of these artists
    pub artist_ids: Vec<String>,
}

fn push_filters(b: &mut SqlBuilder, search: &AlbumSearch) {
    if let Some(term) = non_empty(&search.search_term) {
        let p = b.bind(like_pattern(term));
        b.push(&format!(" AND al.name LIKE {p}"));
    }
    if let Some(album_type) = search.type_filter.db_value() {
        let p = b.bind(album_type);
        b.push(&format!(" AND al.type = {p}"));
    }
    if !search.ids.is_empty() {
        let list = b.bind_list(&search.ids);
        b.push(&format!(" AND al.id IN ({list})"));
    }
    if !search.artist_ids.is_empty() {
        let list = b.bind_list(&search.artist_ids);
        b.push(&format!(
            " AND al.id IN (SELECT album_id FROM album_artist WHERE artist_id IN ({list}))"
        ));
    }
}

pub fn build_albums_query(search: &AlbumSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(&format!(
        "SELECT al.id, al.name, al.release_date, al.release_date_precision, al.popularity, \
         al.num_tracks, al.type, al.label, {} AS artists, {} AS urls \
         FROM album al WHERE 1 = 1",
        credited_artists_sql("album_artist", "album_id", "al.id"),
        album_images_sql("al.id")
    ));
    push_filters(&mut b, search);
    b.push(&format!(
        " ORDER BY {} {}, al.id",
        search.sort_by.column(),
        search.sort_order.as_sql()
    ));
    b.push_page(search.limit, search.offset);
    b.finish()
}

pub fn build_album_count_query(search: &AlbumSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push("SELECT COUNT(*) AS count FROM album al WHERE 1 = 1");
    push_filters(&mut b, search);
    b.finish()
}

/// Album counts per type with each type's share of the matching albums
pub fn build_type_distribution_query(search: &AlbumSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(
        "WITH type_cnt AS (\
         SELECT al.type AS type, COUNT(*) AS cnt FROM album al WHERE 1 = 1",
    );
    push_filters(&mut b, search);
    b.push(
        " AND al.type IS NOT NULL GROUP BY al.type) \
         SELECT type, cnt, 1.0 * cnt / NULLIF((SELECT SUM(cnt) FROM type_cnt), 0) AS ratio \
         FROM type_cnt ORDER BY cnt DESC, type",
    );
    b.finish()
}

fn album_from_row(row: &SqliteRow) -> Result<Album> {
    let (artist_ids, artist_names) = artist_columns(row, "artists")?;
    Ok(Album {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        release_date: row.try_get("release_date")?,
        release_date_precision: row.try_get("release_date_precision")?,
        popularity: row.try_get("popularity")?,
        num_tracks: row.try_get("num_tracks")?,
        album_type: row.try_get("type")?,
        label: row.try_get("label")?,
        artist_ids,
        artist_names,
        urls: json_column(row, "urls")?,
    })
}

pub async fn get_albums(pool: &SqlitePool, search: &AlbumSearch) -> Result<Vec<Album>> {
    let rows = build_albums_query(search).fetch_all(pool).await?;
    rows.iter().map(album_from_row).collect()
}

pub async fn get_album(pool: &SqlitePool, id: &str) -> Result<Option<Album>> {
    let search = AlbumSearch {
        ids: vec![id.to_string()],
        ..Default::default()
    };
    Ok(get_albums(pool, &search).await?.into_iter().next())
}

pub async fn get_album_count(pool: &SqlitePool, search: &AlbumSearch) -> Result<i64> {
    let row = build_album_count_query(search).fetch_one(pool).await?;
    Ok(row.try_get("count")?)
}

pub async fn get_type_distribution(
    pool: &SqlitePool,
    search: &AlbumSearch,
) -> Result<Vec<TypeDistribution>> {
    let rows = build_type_distribution_query(search).fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<TypeDistribution> {
            Ok(TypeDistribution {
                album_type: row.try_get("type")?,
                count: row.try_get("cnt")?,
                ratio: row.try_get("ratio")?,
            })
        })
        .collect()
}
