//! Catalog-wide insights
//!
//! Four fixed analyses over the whole catalog:
//! - how often "love" appears in lyrics, per emotion bucket
//! - the largest popularity jumps between consecutive albums of an artist
//! - artists whose tracks spread widest over the energy/valence plane
//! - the most frequent lyric words of cheerful city pop tracks

use std::collections::{HashMap, HashSet};

use mvista_common::emotion::Emotion;
use mvista_common::models::{ArtistEmotionVariety, ArtistGrowth, LoveDistribution, WordCount};
use mvista_common::sql::{BuiltQuery, SqlBuilder};
use mvista_common::Result;
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Rows returned by the popularity growth insight
pub const GROWTH_LIMIT: i64 = 3;
/// Rows returned by the emotion variety insight
pub const VARIETY_LIMIT: i64 = 5;
/// Rows returned by the pop words insight
pub const POP_WORDS_LIMIT: usize = 40;

/// Minimum popularity of the later album in a growth pair
const GROWTH_MIN_CURR_POPULARITY: i64 = 80;
/// Release dates before this are placeholders in the source data
const GROWTH_MIN_RELEASE_DATE: &str = "1900";
const POP_WORDS_GENRE: &str = "city pop";
const MIN_WORD_LEN: usize = 3;

/// Words too common to say anything about a song
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "because", "as", "so", "than", "such", "i", "me",
    "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us", "our", "ours",
    "ourselves", "they", "them", "their", "theirs", "themselves", "this", "that", "these",
    "those", "about", "above", "across", "after", "against", "along", "among", "around", "at",
    "before", "behind", "below", "beneath", "beside", "between", "beyond", "by", "down",
    "during", "except", "for", "from", "in", "inside", "into", "near", "of", "off", "on", "onto",
    "out", "outside", "over", "past", "since", "through", "throughout", "till", "to", "toward",
    "under", "underneath", "until", "up", "upon", "with", "within", "without", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do", "does", "did",
    "doing", "can", "could", "may", "might", "must", "shall", "should", "will", "would", "very",
    "too", "just", "then", "there", "here", "when", "where", "why", "how", "now", "again",
    "also", "even", "only", "not", "no", "all", "any", "both", "each", "few", "more", "most",
    "other", "some", "same", "own", "else", "whether", "while", "though", "although", "one",
    "two", "three", "first", "second", "third", "many", "much", "less", "least", "fewer",
    "fewest",
];

/// Occurrences of "love" per emotion bucket of the track carrying the lyrics
pub fn build_love_distribution_query() -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push(&format!(
        "WITH love_tracks AS (\
         SELECT track_id, \
         (LENGTH(LOWER(lyrics)) - LENGTH(REPLACE(LOWER(lyrics), 'love', ''))) / 4 AS cnt \
         FROM track_lyrics WHERE lyrics LIKE '%love%'), \
         track_emotion AS (\
         SELECT lt.cnt, {} AS emotion \
         FROM love_tracks lt LEFT JOIN track t ON t.id = lt.track_id), \
         per_emotion AS (\
         SELECT emotion, SUM(cnt) AS cnt FROM track_emotion GROUP BY emotion) \
         SELECT emotion, cnt, \
         1.0 * cnt / NULLIF((SELECT SUM(cnt) FROM love_tracks), 0) AS ratio \
         FROM per_emotion ORDER BY cnt DESC, emotion",
        Emotion::sql_case("t.energy", "t.valence")
    ));
    b.finish()
}

/// Biggest popularity growth between an artist's consecutive albums
pub fn build_popularity_growth_query(limit: i64) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    let min_date = b.bind(GROWTH_MIN_RELEASE_DATE);
    let min_pop = b.bind(GROWTH_MIN_CURR_POPULARITY);
    let limit = b.bind(limit);
    b.push(&format!(
        "WITH artist_albums AS (\
         SELECT aa.artist_id, al.id AS album_id, al.name, al.release_date, al.popularity, \
         ROW_NUMBER() OVER (PARTITION BY aa.artist_id ORDER BY al.release_date, al.id) AS rn \
         FROM album_artist aa JOIN album al ON al.id = aa.album_id) \
         SELECT a.id AS artist_id, a.name AS artist, \
         p.album_id AS prev_album_id, p.name AS prev_album, \
         p.release_date AS prev_release_date, p.popularity AS prev_popularity, \
         c.album_id AS curr_album_id, c.name AS curr_album, \
         c.release_date AS curr_release_date, c.popularity AS curr_popularity, \
         ROUND(100.0 * (c.popularity - p.popularity) / p.popularity, 2) AS popularity_growth_ratio \
         FROM artist a \
         JOIN artist_albums p ON p.artist_id = a.id \
         JOIN artist_albums c ON c.artist_id = a.id AND c.rn = p.rn + 1 \
         WHERE p.popularity > 0 \
         AND p.release_date >= {min_date} AND c.release_date >= {min_date} \
         AND c.popularity >= {min_pop} \
         ORDER BY popularity_growth_ratio DESC, a.id, c.album_id \
         LIMIT {limit}"
    ));
    b.finish()
}

/// Artists ranked by variance of energy plus variance of valence
pub fn build_emotion_variety_query(limit: i64) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    let limit = b.bind(limit);
    b.push(&format!(
        "WITH artist_tracks AS (\
         SELECT ar.id, ar.name, t.energy, t.valence \
         FROM artist ar \
         JOIN track_artist ta ON ta.artist_id = ar.id \
         JOIN track t ON t.id = ta.track_id \
         WHERE t.energy IS NOT NULL AND t.valence IS NOT NULL), \
         mean AS (\
         SELECT id, AVG(energy) AS avg_energy, AVG(valence) AS avg_valence, COUNT(*) AS track_num \
         FROM artist_tracks GROUP BY id) \
         SELECT at.id, at.name, \
         SUM((at.energy - m.avg_energy) * (at.energy - m.avg_energy)) / m.track_num \
         + SUM((at.valence - m.avg_valence) * (at.valence - m.avg_valence)) / m.track_num AS variety \
         FROM artist_tracks at JOIN mean m ON m.id = at.id \
         GROUP BY at.id, at.name, m.track_num \
         ORDER BY variety DESC, at.id \
         LIMIT {limit}"
    ));
    b.finish()
}

/// Lyrics of cheerful tracks by artists tagged with a city pop genre
pub fn build_pop_lyrics_query() -> BuiltQuery {
    let mut b = SqlBuilder::new();
    let genre = b.bind(format!("%{}%", POP_WORDS_GENRE));
    b.push(&format!(
        "SELECT tl.lyrics FROM track_lyrics tl \
         WHERE tl.lyrics IS NOT NULL AND tl.track_id IN (\
         SELECT ta.track_id FROM track_artist ta JOIN track t ON t.id = ta.track_id \
         WHERE ta.artist_id IN (SELECT artist_id FROM artist_genre WHERE genre LIKE {genre})"
    ));
    let cheerful = Emotion::Cheerful.push_predicate(&mut b, "t.energy", "t.valence");
    b.push(&format!(" AND {cheerful}) ORDER BY tl.track_id"));
    b.finish()
}

/// Most frequent words across `texts`, most common first.
///
/// Words are split on whitespace, stripped to ASCII letters and lowercased.
/// Words shorter than three letters and stop words are skipped. Ties are
/// broken alphabetically.
pub fn word_frequencies<'a, I>(texts: I, limit: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut counts: HashMap<String, i64> = HashMap::new();

    for text in texts {
        for raw in text.split_whitespace() {
            let word: String = raw
                .chars()
                .filter(char::is_ascii_alphabetic)
                .map(|c| c.to_ascii_lowercase())
                .collect();
            if word.len() < MIN_WORD_LEN || stop.contains(word.as_str()) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, cnt)| WordCount { word, cnt })
        .collect();
    words.sort_by(|a, b| b.cnt.cmp(&a.cnt).then_with(|| a.word.cmp(&b.word)));
    words.truncate(limit);
    words
}

pub async fn get_love_distribution(pool: &SqlitePool) -> Result<Vec<LoveDistribution>> {
    let rows = build_love_distribution_query().fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<LoveDistribution> {
            Ok(LoveDistribution {
                emotion: row.try_get("emotion")?,
                cnt: row.try_get("cnt")?,
                ratio: row.try_get("ratio")?,
            })
        })
        .collect()
}

pub async fn get_popularity_growth(pool: &SqlitePool, limit: i64) -> Result<Vec<ArtistGrowth>> {
    let rows = build_popularity_growth_query(limit).fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<ArtistGrowth> {
            Ok(ArtistGrowth {
                artist_id: row.try_get("artist_id")?,
                artist: row.try_get("artist")?,
                prev_album_id: row.try_get("prev_album_id")?,
                prev_album: row.try_get("prev_album")?,
                prev_release_date: row.try_get("prev_release_date")?,
                prev_popularity: row.try_get("prev_popularity")?,
                curr_album_id: row.try_get("curr_album_id")?,
                curr_album: row.try_get("curr_album")?,
                curr_release_date: row.try_get("curr_release_date")?,
                curr_popularity: row.try_get("curr_popularity")?,
                popularity_growth_ratio: row.try_get("popularity_growth_ratio")?,
            })
        })
        .collect()
}

pub async fn get_emotion_variety(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<ArtistEmotionVariety>> {
    let rows = build_emotion_variety_query(limit).fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<ArtistEmotionVariety> {
            Ok(ArtistEmotionVariety {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                variety: row.try_get("variety")?,
            })
        })
        .collect()
}

pub async fn get_pop_words(pool: &SqlitePool) -> Result<Vec<WordCount>> {
    let rows = build_pop_lyrics_query().fetch_all(pool).await?;
    let lyrics = rows
        .iter()
        .map(|row| row.try_get::<String, _>("lyrics"))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("Counting words over {} lyrics", lyrics.len());
    Ok(word_frequencies(lyrics.iter().map(String::as_str), POP_WORDS_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvista_common::sql::SqlParam;

    #[test]
    fn test_word_frequencies_counts_and_orders() {
        let words = word_frequencies(
            ["Sunny sunny day, the city lights", "city LIGHTS! sunny"],
            10,
        );
        assert_eq!(
            words,
            vec![
                WordCount { word: "sunny".into(), cnt: 3 },
                WordCount { word: "city".into(), cnt: 2 },
                WordCount { word: "lights".into(), cnt: 2 },
                WordCount { word: "day".into(), cnt: 1 },
            ]
        );
    }

    #[test]
    fn test_word_frequencies_drops_stop_words_and_short_words() {
        let words = word_frequencies(["you and me, we are in it together ok"], 10);
        assert_eq!(words, vec![WordCount { word: "together".into(), cnt: 1 }]);
    }

    #[test]
    fn test_word_frequencies_strips_non_letters() {
        let words = word_frequencies(["don't ''love'' lo-ve 123"], 10);
        assert_eq!(
            words,
            vec![
                WordCount { word: "love".into(), cnt: 2 },
                WordCount { word: "dont".into(), cnt: 1 },
            ]
        );
    }

    #[test]
    fn test_word_frequencies_respects_limit() {
        let text = "alpha beta gamma delta alpha";
        let words = word_frequencies([text], 2);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "alpha");
        assert_eq!(words[1].word, "beta");
        assert!(word_frequencies(std::iter::empty::<&str>(), 5).is_empty());
    }

    #[test]
    fn test_insight_queries_are_consistent() {
        for q in [
            build_love_distribution_query(),
            build_popularity_growth_query(GROWTH_LIMIT),
            build_emotion_variety_query(VARIETY_LIMIT),
            build_pop_lyrics_query(),
        ] {
            assert!(q.is_consistent(), "placeholders out of step: {}", q.sql);
        }
    }

    #[test]
    fn test_growth_query_binds_thresholds() {
        let q = build_popularity_growth_query(3);
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text("1900".into()),
                SqlParam::Int(80),
                SqlParam::Int(3),
            ]
        );
        assert!(q.sql.contains("PARTITION BY aa.artist_id"));
    }

    #[test]
    fn test_pop_lyrics_query_uses_cheerful_cell() {
        let q = build_pop_lyrics_query();
        assert_eq!(q.params.len(), 5);
        assert_eq!(q.params[0], SqlParam::Text("%city pop%".into()));
        assert_eq!(q.params[1], SqlParam::Real(0.333));
        assert_eq!(q.params[4], SqlParam::Real(1.0));
    }
}
