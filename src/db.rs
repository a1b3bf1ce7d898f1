use std::fs;
use std::path::Path;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::EngineResult;

pub type DbPool = SqlitePool;

/// Initialize the backing store at a file path and run migrations.
///
/// The engine only ever needs key-value access; the schema is a single
/// `kv_store` table (see `migrations/`).
pub async fn initialize_db(db_path: &Path) -> EngineResult<DbPool> {
  if let Some(parent) = db_path.parent() {
    fs::create_dir_all(parent)?;
  }
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!(path = %db_path.display(), "initializing cycle engine store");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// In-memory store, used by tests and previews.
///
/// max_connections(1) prevents the pool from opening several isolated
/// in-memory databases.
pub async fn initialize_in_memory() -> EngineResult<DbPool> {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Key-Value Access
/// ---------------------------------------------------------------------------

/// Fetch the raw value stored under a key.
pub async fn kv_get(pool: &DbPool, key: &str) -> EngineResult<Option<String>> {
  let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?1")
    .bind(key)
    .fetch_optional(pool)
    .await?;
  Ok(row.map(|(value,)| value))
}

/// Upsert a value under a key.
pub async fn kv_set(pool: &DbPool, key: &str, value: &str) -> EngineResult<()> {
  sqlx::query(
    r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, datetime('now'))
    ON CONFLICT(key) DO UPDATE SET
      value = excluded.value,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(key)
  .bind(value)
  .execute(pool)
  .await?;
  Ok(())
}

/// Enumerate known keys, optionally restricted to a prefix.
pub async fn kv_keys(pool: &DbPool, prefix: &str) -> EngineResult<Vec<String>> {
  let rows: Vec<(String,)> = sqlx::query_as(
    "SELECT key FROM kv_store WHERE key LIKE ?1 || '%' ORDER BY key",
  )
  .bind(prefix)
  .fetch_all(pool)
  .await?;
  Ok(rows.into_iter().map(|(key,)| key).collect())
}
