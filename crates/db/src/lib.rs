//! SQLite persistence for task history.
//!
//! - [`models`] -- row structs decoded with `sqlx::FromRow`.
//! - [`repositories`] -- zero-sized repos with async query methods taking
//!   `&DbPool` as the first argument.
//! - [`store`] -- [`store::SqlTaskHistoryStore`], the core store trait over a pool.
//!
//! Queries use the runtime-checked `sqlx::query_as` form so no
//! `DATABASE_URL` is needed at compile time. Migrations are embedded from
//! `./migrations` relative to this crate.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL such as
/// `sqlite://taskhist.db`. The database file is created if missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// Every SQLite connection to `:memory:` opens its own database, so the pool
/// is pinned to a single connection that is never reaped.
pub async fn create_in_memory_pool() -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
