// ABOUTME: Schema creation for the account tables
// ABOUTME: Idempotent, safe to run on every startup

use sqlx::SqlitePool;
use tracing::debug;

use crate::StorageError;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE COLLATE NOCASE,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        unconfirmed_email TEXT,
        password_hash TEXT NOT NULL,
        flags INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

const CREATE_TOKENS: &str = r#"
    CREATE TABLE IF NOT EXISTS tokens (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        code TEXT NOT NULL,
        type INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        PRIMARY KEY (user_id, code, type)
    )
"#;

/// Create the users and tokens tables if they do not exist yet
pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    debug!("Ensuring account schema exists");

    let mut tx = pool.begin().await.map_err(StorageError::Sqlx)?;

    sqlx::query(CREATE_USERS)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query(CREATE_TOKENS)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

    tx.commit().await.map_err(StorageError::Sqlx)?;

    Ok(())
}
