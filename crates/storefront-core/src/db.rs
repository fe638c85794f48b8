//! `SQLite` pool helpers shared by storage layers.

use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

/// Errors at the persistence-gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
            Self::Duplicate(e.to_string())
        } else {
            Self::Query(e.to_string())
        }
    }
}

/// Open (or create) a `SQLite` pool at `path`, creating parent
/// directories as needed. WAL journal, foreign keys on, 5s busy timeout.
pub async fn open_pool(path: &Path) -> Result<Pool<Sqlite>, DatabaseError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io(e.to_string()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = connect(options, 5).await?;
    debug!(path = %path.display(), "database pool opened");
    Ok(pool)
}

/// Open an in-memory `SQLite` pool (for testing).
///
/// Capped at one connection: each in-memory connection is its own
/// database, so a larger pool would scatter state.
pub async fn open_pool_in_memory() -> Result<Pool<Sqlite>, DatabaseError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DatabaseError::Connection(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    connect(options, 1).await
}

async fn connect(
    options: SqliteConnectOptions,
    max_connections: u32,
) -> Result<Pool<Sqlite>, DatabaseError> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| DatabaseError::Connection(e.to_string()))
}

/// Current time as Unix seconds. Row timestamps all come from here.
#[allow(clippy::cast_possible_wrap)]
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_timestamp_is_reasonable() {
        // After 2024-01-01.
        assert!(unix_timestamp() > 1_704_067_200);
    }

    #[tokio::test]
    async fn open_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");
        let pool = open_pool(&path).await.unwrap();
        assert!(path.parent().unwrap().exists());
        drop(pool);
    }

    #[tokio::test]
    async fn in_memory_pool_works() {
        let pool = open_pool_in_memory().await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 1);
    }
}
