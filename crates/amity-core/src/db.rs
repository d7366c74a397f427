//! # SQLite Stores
//!
//! Amity keeps two independent stores: `users.db` (accounts and friendship
//! edges, owned by the social service) and `notifications.db` (owned by the
//! notification service). Neither service reads the other's file.
//!
//! Each store crate declares its handle with [`define_database!`], which
//! connects through [`connect`] and applies the crate's `migrations/`.

use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

/// Connections kept for a file-backed store.
const FILE_POOL_SIZE: u32 = 5;

/// How long a writer waits on a locked file before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage failures. Only [`DatabaseError::NotFound`] is a caller mistake;
/// everything else surfaces as an internal error.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Cannot prepare store directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open store: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// The named record does not exist.
    #[error("{0} not found")]
    NotFound(String),
}

/// Where a store lives.
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    /// A database file; missing parent directories are created.
    File(&'a Path),
    /// A private in-memory database that disappears with its pool.
    Memory,
}

/// Open a connection pool for `location` with foreign keys enforced.
///
/// File stores run in WAL mode so readers never block the writer, and
/// writers queue behind each other for up to [`BUSY_TIMEOUT`]. A `:memory:`
/// database exists per connection, so the in-memory pool holds exactly one
/// connection and never retires it.
pub async fn connect(location: Location<'_>) -> Result<SqlitePool, DatabaseError> {
    let (options, pool) = match location {
        Location::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(BUSY_TIMEOUT);
            (
                options,
                SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE),
            )
        }
        Location::Memory => {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(DatabaseError::Connection)?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool)
        }
    };

    let pool = pool
        .connect_with(options.foreign_keys(true))
        .await
        .map_err(DatabaseError::Connection)?;

    if let Location::File(path) = location {
        info!(path = %path.display(), "Store opened");
    }
    Ok(pool)
}

/// Current time as seconds since the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Declare a store handle backed by the invoking crate's `migrations/`.
///
/// ```ignore
/// amity_core::define_database!(SocialDatabase, "social");
/// ```
///
/// The handle is a cheap clone around the pool and exposes `open(path)`,
/// `open_in_memory()` and `pool()`. The label names the store in logs.
#[macro_export]
macro_rules! define_database {
    ($name:ident, $store:literal) => {
        #[doc = concat!("Handle to the ", $store, " store.")]
        #[derive(Clone)]
        pub struct $name {
            pool: ::sqlx::SqlitePool,
        }

        impl $name {
            /// Open the store file at `path`, creating it if needed.
            pub async fn open(
                path: &::std::path::Path,
            ) -> ::std::result::Result<Self, $crate::db::DatabaseError> {
                Self::at($crate::db::Location::File(path)).await
            }

            /// Open a throwaway in-memory store.
            pub async fn open_in_memory() -> ::std::result::Result<Self, $crate::db::DatabaseError>
            {
                Self::at($crate::db::Location::Memory).await
            }

            async fn at(
                location: $crate::db::Location<'_>,
            ) -> ::std::result::Result<Self, $crate::db::DatabaseError> {
                let pool = $crate::db::connect(location).await?;
                ::sqlx::migrate!().run(&pool).await?;
                ::tracing::info!(store = $store, "Schema up to date");
                Ok(Self { pool })
            }

            pub const fn pool(&self) -> &::sqlx::SqlitePool {
                &self.pool
            }
        }
    };
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unix_timestamp_is_reasonable() {
        // After 2024-01-01.
        assert!(unix_timestamp() > 1_704_067_200);
    }

    #[tokio::test]
    async fn file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.db");

        let pool = connect(Location::File(&path)).await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();

        assert_eq!(row.0, 1);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn file_store_keeps_data_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.db");

        let pool = connect(Location::File(&path)).await.unwrap();
        sqlx::query("CREATE TABLE kv (v INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO kv (v) VALUES (7)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let reopened = connect(Location::File(&path)).await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT v FROM kv")
            .fetch_one(&reopened)
            .await
            .unwrap();
        assert_eq!(row.0, 7);
    }

    #[tokio::test]
    async fn in_memory_stores_are_isolated() {
        let a = connect(Location::Memory).await.unwrap();
        let b = connect(Location::Memory).await.unwrap();

        sqlx::query("CREATE TABLE only_in_a (v INTEGER)")
            .execute(&a)
            .await
            .unwrap();

        let in_b: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE name = 'only_in_a'")
                .fetch_one(&b)
                .await
                .unwrap();
        assert_eq!(in_b.0, 0);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = connect(Location::Memory).await.unwrap();
        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 1);
    }
}
