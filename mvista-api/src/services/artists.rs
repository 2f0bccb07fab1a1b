//! Artist queries: search, counts, genre/emotion distributions, collaborators

use std::fmt;
use std::str::FromStr;

use mvista_common::emotion::Emotion;
use mvista_common::models::{Artist, EmotionDistribution, GenreDistribution};
use mvista_common::sql::{like_pattern, BuiltQuery, SortOrder, SqlBuilder};
use mvista_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::shared::{artist_genres_sql, artist_images_sql, json_column, non_empty};

/// Number of genres kept by the genre distribution
pub const GENRE_DISTRIBUTION_TOP: i64 = 10;

/// Sortable artist columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtistSort {
    #[default]
    Popularity,
    Name,
    Followers,
}

impl ArtistSort {
    fn column(self) -> &'static str {
        match self {
            ArtistSort::Popularity => "a.popularity",
            ArtistSort::Name => "a.name",
            ArtistSort::Followers => "a.followers",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtistSort::Popularity => "popularity",
            ArtistSort::Name => "name",
            ArtistSort::Followers => "followers",
        }
    }
}

impl fmt::Display for ArtistSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtistSort {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "popularity" => Ok(ArtistSort::Popularity),
            "name" => Ok(ArtistSort::Name),
            "followers" => Ok(ArtistSort::Followers),
            other => Err(Error::InvalidInput(format!("unknown artist sort: {}", other))),
        }
    }
}

/// Artist search request; absent fields are not filtered on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistSearch {
    pub search_term: Option<String>,
    pub genre_filter: Option<String>,
    pub ids: Vec<String>,
    pub sort_by: ArtistSort,
    pub sort_order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ArtistSearch {
    pub fn by_id(id: &str) -> Self {
        Self {
            ids: vec![id.to_string()],
            ..Default::default()
        }
    }
}

/// How the genre filter constrains a query
#[derive(Debug, Clone, Copy)]
enum GenreMatch {
    /// Artist must have at least one matching genre
    Artist,
    /// Only matching `ag.genre` rows take part
    Row,
}

/// Append the search filters in fixed order: name, genre, ids
fn push_filters(b: &mut SqlBuilder, search: &ArtistSearch, genre: GenreMatch) {
    if let Some(term) = non_empty(&search.search_term) {
        let p = b.bind(like_pattern(term));
        b.push(&format!(" AND a.name LIKE {p}"));
    }
    if let Some(filter) = non_empty(&search.genre_filter) {
        let p = b.bind(like_pattern(filter));
        match genre {
            GenreMatch::Artist => b.push(&format!(
                " AND EXISTS (SELECT 1 FROM artist_genre g WHERE g.artist_id = a.id AND g.genre LIKE {p})"
            )),
            GenreMatch::Row => b.push(&format!(" AND ag.genre LIKE {p}")),
        };
    }
    if !search.ids.is_empty() {
        let list = b.bind_list(&search.ids);
        b.push(&format!(" AND a.id IN ({list})"));
    }
}

pub fn build_artists_query(search: &ArtistSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(&format!(
        "SELECT a.id, a.name, a.popularity, a.followers, {} AS genres, {} AS urls \
         FROM artist a WHERE 1 = 1",
        artist_genres_sql("a.id"),
        artist_images_sql("a.id")
    ));
    push_filters(&mut b, search, GenreMatch::Artist);
    b.push(&format!(
        " ORDER BY {} {}, a.id",
        search.sort_by.column(),
        search.sort_order.as_sql()
    ));
    b.push_page(search.limit, search.offset);
    b.finish()
}

pub fn build_artist_count_query(search: &ArtistSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push("SELECT COUNT(*) AS artist_cnt FROM artist a WHERE 1 = 1");
    push_filters(&mut b, search, GenreMatch::Artist);
    b.finish()
}

pub fn build_genre_count_query() -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push("SELECT COUNT(DISTINCT genre) AS genre_cnt FROM artist_genre");
    b.finish()
}

/// Top genres among matching artists, ratio relative to the kept genres
pub fn build_genre_distribution_query(search: &ArtistSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(
        "WITH genre_cnt AS (\
         SELECT ag.genre AS genre, COUNT(*) AS artist_num \
         FROM artist_genre ag JOIN artist a ON a.id = ag.artist_id \
         WHERE 1 = 1",
    );
    push_filters(&mut b, search, GenreMatch::Row);
    let top = b.bind(GENRE_DISTRIBUTION_TOP);
    b.push(&format!(
        " GROUP BY ag.genre ORDER BY artist_num DESC, ag.genre LIMIT {top}) \
         SELECT genre, artist_num, \
         1.0 * artist_num / (SELECT SUM(artist_num) FROM genre_cnt) AS ratio \
         FROM genre_cnt ORDER BY artist_num DESC, genre"
    ));
    b.finish()
}

/// Emotion buckets over all distinct tracks of matching artists
pub fn build_emotion_distribution_query(search: &ArtistSearch) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(
        "WITH matched AS (\
         SELECT DISTINCT t.id, t.energy, t.valence \
         FROM track t \
         JOIN track_artist ta ON ta.track_id = t.id \
         JOIN artist a ON a.id = ta.artist_id \
         WHERE 1 = 1",
    );
    push_filters(&mut b, search, GenreMatch::Artist);
    b.push(&format!(
        "), emotion_cnt AS (\
         SELECT {} AS emotion, COUNT(*) AS track_num FROM matched GROUP BY emotion) \
         SELECT emotion, track_num, \
         1.0 * track_num / (SELECT SUM(track_num) FROM emotion_cnt) AS ratio \
         FROM emotion_cnt ORDER BY track_num DESC, emotion",
        Emotion::sql_case("energy", "valence")
    ));
    b.finish()
}

/// Artists sharing at least one track with `artist_id`, most shared first
pub fn build_collaborators_query(artist_id: &str) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    let id = b.bind(artist_id);
    b.push(&format!(
        "WITH collab AS (\
         SELECT ta.artist_id, COUNT(*) AS collab_num \
         FROM track_artist ta \
         WHERE ta.track_id IN (SELECT track_id FROM track_artist WHERE artist_id = {id}) \
         AND ta.artist_id <> {id} \
         GROUP BY ta.artist_id) \
         SELECT a.id, a.name, a.popularity, a.followers, {} AS genres, {} AS urls, c.collab_num \
         FROM collab c JOIN artist a ON a.id = c.artist_id \
         ORDER BY c.collab_num DESC, a.id",
        artist_genres_sql("a.id"),
        artist_images_sql("a.id")
    ));
    b.finish()
}

fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        popularity: row.try_get("popularity")?,
        followers: row.try_get("followers")?,
        genres: json_column(row, "genres")?,
        urls: json_column(row, "urls")?,
        collab_num: None,
    })
}

pub async fn get_artists(pool: &SqlitePool, search: &ArtistSearch) -> Result<Vec<Artist>> {
    let rows = build_artists_query(search).fetch_all(pool).await?;
    rows.iter().map(artist_from_row).collect()
}

pub async fn get_artist(pool: &SqlitePool, id: &str) -> Result<Option<Artist>> {
    let artists = get_artists(pool, &ArtistSearch::by_id(id)).await?;
    Ok(artists.into_iter().next())
}

pub async fn get_artist_count(pool: &SqlitePool, search: &ArtistSearch) -> Result<i64> {
    let row = build_artist_count_query(search).fetch_one(pool).await?;
    Ok(row.try_get("artist_cnt")?)
}

pub async fn get_genre_count(pool: &SqlitePool) -> Result<i64> {
    let row = build_genre_count_query().fetch_one(pool).await?;
    Ok(row.try_get("genre_cnt")?)
}

pub async fn get_genre_distribution(
    pool: &SqlitePool,
    search: &ArtistSearch,
) -> Result<Vec<GenreDistribution>> {
    let rows = build_genre_distribution_query(search).fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<GenreDistribution> {
            Ok(GenreDistribution {
                genre: row.try_get("genre")?,
                artist_num: row.try_get("artist_num")?,
                ratio: row.try_get("ratio")?,
            })
        })
        .collect()
}

pub async fn get_emotion_distribution(
    pool: &SqlitePool,
    search: &ArtistSearch,
) -> Result<Vec<EmotionDistribution>> {
    let rows = build_emotion_distribution_query(search).fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<EmotionDistribution> {
            Ok(EmotionDistribution {
                emotion: row.try_get("emotion")?,
                track_num: row.try_get("track_num")?,
                ratio: row.try_get("ratio")?,
            })
        })
        .collect()
}

pub async fn get_collaborators(pool: &SqlitePool, artist_id: &str) -> Result<Vec<Artist>> {
    let rows = build_collaborators_query(artist_id).fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<Artist> {
            let mut artist = artist_from_row(row)?;
            artist.collab_num = Some(row.try_get("collab_num")?);
            Ok(artist)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvista_common::sql::SqlParam;

    /// Every combination of the optional search inputs
    fn all_searches() -> Vec<ArtistSearch> {
        (0u8..32)
            .map(|mask| ArtistSearch {
                search_term: ((mask & 1) != 0).then(|| "mari".to_string()),
                genre_filter: ((mask & 2) != 0).then(|| "city pop".to_string()),
                ids: if (mask & 4) != 0 {
                    vec!["a1".to_string(), "a2".to_string()]
                } else {
                    Vec::new()
                },
                limit: ((mask & 8) != 0).then_some(10),
                offset: ((mask & 16) != 0).then_some(20),
                ..Default::default()
            })
            .collect()
    }

    fn expected_filter_params(search: &ArtistSearch) -> usize {
        usize::from(search.search_term.is_some())
            + usize::from(search.genre_filter.is_some())
            + search.ids.len()
    }

    fn assert_omitted_filters(sql: &str, search: &ArtistSearch) {
        if search.search_term.is_none() {
            assert!(!sql.contains("a.name LIKE"), "unexpected name filter: {sql}");
        }
        if search.genre_filter.is_none() {
            assert!(!sql.contains("genre LIKE"), "unexpected genre filter: {sql}");
        }
        if search.ids.is_empty() {
            assert!(!sql.contains("a.id IN"), "unexpected id filter: {sql}");
        }
    }

    #[test]
    fn test_artists_query_all_filter_subsets() {
        for search in all_searches() {
            let q = build_artists_query(&search);
            assert!(q.is_consistent(), "placeholders out of step: {}", q.sql);
            let page = usize::from(search.limit.is_some()) + usize::from(search.offset.is_some());
            assert_eq!(q.params.len(), expected_filter_params(&search) + page);
            assert_omitted_filters(&q.sql, &search);
            if search.limit.is_none() && search.offset.is_none() {
                assert!(!q.sql.contains("LIMIT"));
            }
            if search.offset.is_none() {
                assert!(!q.sql.contains("OFFSET"));
            }
        }
    }

    #[test]
    fn test_aggregate_queries_all_filter_subsets() {
        for search in all_searches() {
            let count = build_artist_count_query(&search);
            assert!(count.is_consistent(), "{}", count.sql);
            assert_eq!(count.params.len(), expected_filter_params(&search));
            assert_omitted_filters(&count.sql, &search);

            let genres = build_genre_distribution_query(&search);
            assert!(genres.is_consistent(), "{}", genres.sql);
            assert_eq!(genres.params.len(), expected_filter_params(&search) + 1);
            assert_omitted_filters(&genres.sql, &search);

            let emotions = build_emotion_distribution_query(&search);
            assert!(emotions.is_consistent(), "{}", emotions.sql);
            assert_eq!(emotions.params.len(), expected_filter_params(&search));
            assert_omitted_filters(&emotions.sql, &search);
        }
    }

    #[test]
    fn test_params_follow_placeholder_order() {
        let search = ArtistSearch {
            search_term: Some("mari".into()),
            genre_filter: Some("city pop".into()),
            ids: vec!["a1".into(), "a2".into()],
            limit: Some(10),
            offset: Some(20),
            ..Default::default()
        };
        let q = build_artists_query(&search);
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text("%mari%".into()),
                SqlParam::Text("%city pop%".into()),
                SqlParam::Text("a1".into()),
                SqlParam::Text("a2".into()),
                SqlParam::Int(10),
                SqlParam::Int(20),
            ]
        );
        assert!(q.sql.contains("a.name LIKE $1"));
        assert!(q.sql.contains("g.genre LIKE $2"));
        assert!(q.sql.contains("a.id IN ($3, $4)"));
        assert!(q.sql.ends_with("LIMIT $5 OFFSET $6"));
    }

    #[test]
    fn test_builders_are_deterministic() {
        for search in all_searches() {
            assert_eq!(build_artists_query(&search), build_artists_query(&search));
            assert_eq!(
                build_genre_distribution_query(&search),
                build_genre_distribution_query(&search)
            );
        }
    }

    #[test]
    fn test_empty_strings_are_not_filters() {
        let search = ArtistSearch {
            search_term: Some(String::new()),
            genre_filter: Some(String::new()),
            ..Default::default()
        };
        let q = build_artist_count_query(&search);
        assert!(q.params.is_empty());
        assert_eq!(q.sql, "SELECT COUNT(*) AS artist_cnt FROM artist a WHERE 1 = 1");
    }

    #[test]
    fn test_non_positive_page_values_are_dropped() {
        let search = ArtistSearch {
            limit: Some(0),
            offset: Some(-5),
            ..Default::default()
        };
        let q = build_artists_query(&search);
        assert!(q.params.is_empty());
        assert!(!q.sql.contains("LIMIT"));
    }

    #[test]
    fn test_sort_column_and_direction() {
        let search = ArtistSearch {
            sort_by: ArtistSort::Followers,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        assert!(build_artists_query(&search)
            .sql
            .contains("ORDER BY a.followers ASC, a.id"));
        assert_eq!("name".parse::<ArtistSort>().unwrap(), ArtistSort::Name);
        assert!("age".parse::<ArtistSort>().is_err());
    }

    #[test]
    fn test_collaborators_reuses_artist_placeholder() {
        let q = build_collaborators_query("a1");
        assert_eq!(q.params, vec![SqlParam::Text("a1".into())]);
        assert!(q.is_consistent());
        assert!(q.sql.contains("ta.artist_id <> $1"));
    }
}
