use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

/// Opens (creating if needed) the board database, enables foreign keys and
/// WAL, and applies pending migrations.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    // In-memory databases stay in "memory" mode.
    let journal_mode = verify_wal_mode(&pool).await?;
    if journal_mode.eq_ignore_ascii_case("wal") {
        tracing::info!(database_url, "Taskboard database ready (WAL)");
    } else {
        tracing::warn!(database_url, journal_mode = journal_mode.as_str(), "WAL not active on taskboard database");
    }

    Ok(pool)
}

/// Current `journal_mode` of the database behind `pool`.
pub async fn verify_wal_mode(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row = sqlx::query("PRAGMA journal_mode")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<String, _>(0))
}
