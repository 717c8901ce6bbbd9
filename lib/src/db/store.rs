//! Durable store for service observation counts.
//!
//! [`FrequencyStore`] is the single source of truth for historical usage:
//! one row per distinct service ever observed, created at count 1 on first
//! observation and incremented by 1 on every later one. Rows are never
//! deleted and counts never decrease.
//!
//! ## Usage
//!
//! ```no_run
//! use skyline_lib::db::FrequencyStore;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FrequencyStore::connect(Path::new("service_frequency.db")).await?;
//! store.increment("s3").await?;
//!
//! let snapshot = store.snapshot().await?;
//! println!("distinct services: {}", snapshot.len());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use super::{DbError, DbPool, DbResult, init_memory_pool, init_pool, run_migrations};

/// SQLite-backed store of per-service observation counts.
///
/// Uses a connection pool internally and is safe to share across tasks
/// (implements `Send + Sync`). The upsert in [`increment`](Self::increment)
/// is a single statement, so concurrent callers cannot lose updates.
pub struct FrequencyStore {
    pool: DbPool,
}

impl FrequencyStore {
    /// Connect to the frequency database at the given path.
    ///
    /// Creates the database file if it doesn't exist and runs migrations.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The database connection cannot be established
    /// - Migrations fail to apply
    pub async fn connect(path: &Path) -> DbResult<Self> {
        let pool = init_pool(path).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Create an in-memory store for testing.
    ///
    /// The database is initialized with the schema and ready to use.
    pub async fn in_memory() -> DbResult<Self> {
        let pool = init_memory_pool().await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Get access to the underlying connection pool.
    ///
    /// Useful for advanced queries or testing.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Record one observation of `service`.
    ///
    /// Inserts a row with count 1 on first observation, otherwise adds 1 to
    /// the existing count. The write is committed before this returns.
    pub async fn increment(&self, service: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO service_frequency (service, frequency)
            VALUES (?1, 1)
            ON CONFLICT(service) DO UPDATE SET
            frequency = frequency + 1
            "#,
        )
        .bind(service)
        .execute(&self.pool)
        .await
        .map_err(DbError::QueryFailed)?;

        Ok(())
    }

    /// Read the full set of records as a service -> count mapping.
    ///
    /// Reflects every increment committed before the call. Calling twice
    /// without intervening writes returns equal mappings.
    pub async fn snapshot(&self) -> DbResult<BTreeMap<String, u64>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT service, frequency FROM service_frequency")
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::QueryFailed)?;

        Ok(rows.into_iter().map(|(service, n)| (service, n as u64)).collect())
    }

    /// Get the count for a single service, `None` if never observed.
    pub async fn count(&self, service: &str) -> DbResult<Option<u64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT frequency FROM service_frequency WHERE service = ?1")
                .bind(service)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::QueryFailed)?;

        Ok(row.map(|(n,)| n as u64))
    }

    /// Total observations across all services.
    pub async fn total_observations(&self) -> DbResult<u64> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(frequency), 0) FROM service_frequency")
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::QueryFailed)?;

        Ok(total as u64)
    }
}
