//! Row decoding and SQL fragments used by several services

use mvista_common::models::ArtistRef;
use mvista_common::Result;
use serde::de::DeserializeOwned;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Present, non-empty filter text
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Decode a JSON column produced by `json_group_array`; NULL decodes to the default
pub(crate) fn json_column<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let raw: Option<String> = row.try_get(column)?;
    match raw {
        Some(text) => Ok(serde_json::from_str(&text)?),
        None => Ok(T::default()),
    }
}

/// Credited artists as parallel id and name lists
pub(crate) fn artist_columns(row: &SqliteRow, column: &str) -> Result<(Vec<String>, Vec<String>)> {
    let refs: Vec<ArtistRef> = json_column(row, column)?;
    Ok(refs
        .into_iter()
        .map(|r| (r.id, r.name.unwrap_or_default()))
        .unzip())
}

/// SQLite stores booleans as 0/1 integers
pub(crate) fn flag_column(row: &SqliteRow, column: &str) -> Result<Option<bool>> {
    let raw: Option<i64> = row.try_get(column)?;
    Ok(raw.map(|v| v != 0))
}

/// JSON array of an artist's genres, alphabetical
pub(crate) fn artist_genres_sql(artist_id: &str) -> String {
    format!(
        "(SELECT json_group_array(genre) FROM \
         (SELECT genre FROM artist_genre WHERE artist_id = {artist_id} ORDER BY genre))"
    )
}

/// JSON array of an artist's image URLs, widest first
pub(crate) fn artist_images_sql(artist_id: &str) -> String {
    format!(
        "(SELECT json_group_array(url) FROM \
         (SELECT url FROM artist_image WHERE artist_id = {artist_id} ORDER BY width DESC, url))"
    )
}

/// JSON array of an album's image URLs, widest first
pub(crate) fn album_images_sql(album_id: &str) -> String {
    format!(
        "(SELECT json_group_array(url) FROM \
         (SELECT url FROM album_image WHERE album_id = {album_id} ORDER BY width DESC, url))"
    )
}

/// JSON array of `{id, name}` objects for the artists credited through a link
/// table, in credit order
pub(crate) fn credited_artists_sql(link_table: &str, owner_column: &str, owner_id: &str) -> String {
    format!(
        "(SELECT json_group_array(json_object('id', x.id, 'name', x.name)) FROM \
         (SELECT ar.id, ar.name FROM {link_table} l JOIN artist ar ON ar.id = l.artist_id \
         WHERE l.{owner_column} = {owner_id} ORDER BY l.rowid) x)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_treats_blank_as_absent() {
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&Some("pop".into())), Some("pop"));
    }

    #[test]
    fn test_fragments_reference_owner_column() {
        assert!(artist_genres_sql("a.id").contains("artist_id = a.id"));
        assert!(album_images_sql("al.id").contains("album_id = al.id"));
        let credited = credited_artists_sql("track_artist", "track_id", "t.id");
        assert!(credited.contains("FROM track_artist l"));
        assert!(credited.contains("l.track_id = t.id"));
    }
}
