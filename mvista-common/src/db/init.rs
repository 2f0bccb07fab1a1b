//! Database initialization
//!
//! The catalog lives in a single SQLite file. On first run the file and its
//! parent directory are created and the schema is laid down; on later runs the
//! `CREATE ... IF NOT EXISTS` statements are no-ops.

use crate::{Error, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the catalog database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open an existing catalog without write access
///
/// Uses SQLite `mode=ro` so committed pages still in the WAL file are read.
/// The schema is not touched.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Config(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=ro", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .connect(&db_url)
        .await?;

    info!("Opened database read-only: {}", db_path.display());
    Ok(pool)
}

/// Fresh in-memory catalog with the schema applied
///
/// Every connection to `sqlite::memory:` is a separate database, so the pool
/// is pinned to a single connection that is never recycled.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all catalog tables and indices (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_artist_tables(pool).await?;
    create_album_tables(pool).await?;
    create_track_tables(pool).await?;
    create_indices(pool).await?;
    Ok(())
}

async fn create_artist_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist (
            id TEXT PRIMARY KEY,
            name TEXT,
            popularity INTEGER,
            followers INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_genre (
            artist_id TEXT NOT NULL REFERENCES artist(id) ON DELETE CASCADE,
            genre TEXT NOT NULL,
            PRIMARY KEY (artist_id, genre)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_image (
            artist_id TEXT NOT NULL REFERENCES artist(id) ON DELETE CASCADE,
            url TEXT NOT NULL,
            height INTEGER,
            width INTEGER,
            PRIMARY KEY (artist_id, url)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_album_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album (
            id TEXT PRIMARY KEY,
            name TEXT,
            release_date TEXT,
            release_date_precision TEXT,
            popularity INTEGER,
            num_tracks INTEGER,
            type TEXT,
            label TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album_artist (
            album_id TEXT NOT NULL REFERENCES album(id) ON DELETE CASCADE,
            artist_id TEXT NOT NULL REFERENCES artist(id) ON DELETE CASCADE,
            PRIMARY KEY (album_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album_image (
            album_id TEXT NOT NULL REFERENCES album(id) ON DELETE CASCADE,
            url TEXT NOT NULL,
            height INTEGER,
            width INTEGER,
            PRIMARY KEY (album_id, url)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_track_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track (
            id TEXT PRIMARY KEY,
            name TEXT,
            album_id TEXT REFERENCES album(id) ON DELETE SET NULL,
            disc_num INTEGER,
            track_num INTEGER,
            duration_ms INTEGER,
            explicit INTEGER,
            danceability REAL,
            energy REAL,
            key INTEGER,
            loudness REAL,
            mode INTEGER,
            speechiness REAL,
            acousticness REAL,
            instrumentalness REAL,
            liveness REAL,
            valence REAL,
            tempo REAL,
            time_signature INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track_artist (
            track_id TEXT NOT NULL REFERENCES track(id) ON DELETE CASCADE,
            artist_id TEXT NOT NULL REFERENCES artist(id) ON DELETE CASCADE,
            PRIMARY KEY (track_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track_lyrics (
            track_id TEXT PRIMARY KEY REFERENCES track(id) ON DELETE CASCADE,
            lyrics TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indices(pool: &SqlitePool) -> Result<()> {
    let statements = [
        "CREATE INDEX IF NOT EXISTS idx_artist_genre_genre ON artist_genre(genre)",
        "CREATE INDEX IF NOT EXISTS idx_album_artist_artist ON album_artist(artist_id)",
        "CREATE INDEX IF NOT EXISTS idx_album_release_date ON album(release_date)",
        "CREATE INDEX IF NOT EXISTS idx_track_album ON track(album_id)",
        "CREATE INDEX IF NOT EXISTS idx_track_artist_artist ON track_artist(artist_id)",
    ];
    for sql in statements {
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_has_catalog_tables() {
        let pool = init_memory_database().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for expected in [
            "album",
            "album_artist",
            "album_image",
            "artist",
            "artist_genre",
            "artist_image",
            "track",
            "track_artist",
            "track_lyrics",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();
    }
}
