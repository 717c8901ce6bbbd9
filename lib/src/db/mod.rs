//! SQLite persistence for service usage counts.
//!
//! The database holds a single `service_frequency` table keyed by service
//! name. Writes go through an atomic upsert so repeated observations of the
//! same service never lose updates, and the pool is configured so that a
//! committed increment survives a process crash.
//!
//! ## Examples
//!
//! ```no_run
//! use skyline_lib::db::FrequencyStore;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FrequencyStore::connect(Path::new("service_frequency.db")).await?;
//! store.increment("lambda").await?;
//! # Ok(())
//! # }
//! ```

mod store;

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use store::FrequencyStore;

/// Type alias for the SQLite connection pool.
pub type DbPool = SqlitePool;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish a database connection.
    #[error("Failed to open frequency database: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// Failed to run database migrations.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A database query failed.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// Database is busy (SQLITE_BUSY).
    #[error("Database is busy, please retry")]
    BusyTimeout,
}

/// Result type for database operations.
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Initialize a SQLite connection pool for the frequency database.
///
/// Configures the pool with:
/// - `busy_timeout=5000ms` - Wait up to 5 seconds for a locked database
/// - `journal_mode=WAL` - Write-ahead logging for better concurrency
/// - `synchronous=FULL` - An acknowledged commit is on disk before `execute`
///   returns, so a crash after a successful increment never loses it
///
/// ## Arguments
///
/// * `path` - Path to the SQLite database file, created if missing.
///
/// ## Errors
///
/// Returns `DbError::ConnectionFailed` if the connection cannot be
/// established.
pub async fn init_pool(path: &Path) -> DbResult<DbPool> {
    let path_str = path.to_string_lossy();

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_millis(5000))
        .pragma("journal_mode", "WAL")
        .pragma("synchronous", "FULL");

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| {
            if is_busy_error(&e) {
                DbError::BusyTimeout
            } else {
                DbError::ConnectionFailed(e)
            }
        })
        .inspect(|_| {
            tracing::debug!(db.path = %path_str, "Frequency database pool initialized");
        })
}

/// Initialize an in-memory SQLite database pool for testing.
///
/// Uses `sqlite::memory:` with a shared cache so multiple connections
/// see the same database.
///
/// ## Errors
///
/// Returns `DbError::ConnectionFailed` if the connection cannot be
/// established.
pub async fn init_memory_pool() -> DbResult<DbPool> {
    // Shared cache mode so migrations persist across connections
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .shared_cache(true)
        .busy_timeout(std::time::Duration::from_millis(5000));

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| {
            if is_busy_error(&e) {
                DbError::BusyTimeout
            } else {
                DbError::ConnectionFailed(e)
            }
        })
}

/// Run embedded database migrations.
///
/// Applies all pending migrations from the `migrations/` directory.
/// Migrations are embedded into the binary at compile time.
///
/// ## Errors
///
/// Returns `DbError::MigrationFailed` if any migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> DbResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DbError::MigrationFailed)?;

    tracing::debug!("Frequency database migrations completed");
    Ok(())
}

/// Check if a sqlx error is a SQLITE_BUSY error.
fn is_busy_error(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            // SQLite BUSY error code is 5
            db_err.code().is_some_and(|code| code == "5")
        }
        _ => false,
    }
}
