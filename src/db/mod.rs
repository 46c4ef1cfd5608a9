pub mod repository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub const MAX_CONNECTIONS: u32 = 5;

/// Opens a pool for `database_url`, creating the database file if needed, and
/// applies the embedded migrations.
///
/// An in-memory database lives inside a single connection, so callers using
/// `sqlite::memory:` should pass `max_connections = 1`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready at {}", database_url);

    Ok(pool)
}
