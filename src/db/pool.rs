//! Connection pool and schema for the encrypted row store.
//!
//! Encryption-at-rest is entirely this layer's concern: when a key is
//! configured, `PRAGMA key` is applied on every new connection (honored by
//! SQLCipher-compatible builds, ignored by plain SQLite). Nothing above
//! this module knows about key material.
//!
//! The CHECK constraints in the schema are generated from the same
//! constants the validator uses (`Emoji::ALL`, `NOTE_MAX_LEN`), so the
//! storage-level defense cannot drift from the application rules.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::mood::Emoji;
use crate::validation::NOTE_MAX_LEN;

pub async fn create_pool(database_url: &str, key: Option<&str>) -> SqlitePool {
    let mut opts = SqliteConnectOptions::from_str(database_url)
        .expect("DATABASE_URL must be a valid sqlite URL")
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    if let Some(key) = key {
        // Quoted per SQLCipher convention; single quotes in the key escaped.
        opts = opts.pragma("key", format!("'{}'", key.replace('\'', "''")));
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(opts)
        .await
        .expect("Failed to create database pool")
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let emoji_set = Emoji::ALL
        .map(|e| format!("'{}'", e.as_symbol()))
        .join(", ");

    // AUTOINCREMENT keeps deleted ids from ever being reassigned.
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS moods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            emoji TEXT NOT NULL CHECK (emoji IN ({emoji_set})),
            note TEXT CHECK (note IS NULL OR length(note) <= {NOTE_MAX_LEN}),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#
    );

    sqlx::query(&ddl).execute(pool).await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_moods_date ON moods (date)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Single-connection in-memory pool with the schema applied. One connection
/// only: each `:memory:` connection is otherwise its own database.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    init_schema(&pool).await.expect("schema");
    pool
}
