// ABOUTME: User and token storage using SQLite
// ABOUTME: Scenario-aware user persistence and single-use confirmation tokens

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, warn};
use usuario_core::{
    validate_email, validate_username, EmailChangeFlags, Scenario, Token, TokenKind, User,
    UserField, UserId,
};

use crate::schema::migrate;
use crate::traits::{TokenStore, UserStore};
use crate::{StorageError, StorageResult};

const USER_COLUMNS: &str =
    "id, username, email, unconfirmed_email, password_hash, flags, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `url` and make sure the schema exists
    pub async fn connect(url: &str) -> StorageResult<Self> {
        debug!("Connecting to account database: {}", url);
        let pool = SqlitePool::connect(url).await.map_err(StorageError::Sqlx)?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database; a single pinned connection keeps it alive
    pub async fn in_memory() -> StorageResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(StorageError::Sqlx)?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn insert_user(&self, user: &mut User) -> StorageResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users
                (username, email, unconfirmed_email, password_hash, flags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.unconfirmed_email)
        .bind(&user.password_hash)
        .bind(i64::from(user.flags.bits()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_write)?;

        user.id = result.last_insert_rowid();
        user.created_at = now;
        user.updated_at = now;
        user.scenario = Scenario::Default;

        debug!(user_id = user.id, "Created user");
        Ok(true)
    }

    async fn update_user(&self, user: &mut User) -> StorageResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, unconfirmed_email = ?,
                password_hash = ?, flags = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.unconfirmed_email)
        .bind(&user.password_hash)
        .bind(i64::from(user.flags.bits()))
        .bind(now)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_write)?;

        if result.rows_affected() == 0 {
            warn!(user_id = user.id, "Update matched no user row");
            return Ok(false);
        }

        user.updated_at = now;
        debug!(user_id = user.id, scenario = %user.scenario, "Updated user");
        Ok(true)
    }

    fn row_to_user(&self, row: &SqliteRow) -> StorageResult<User> {
        let flags: i64 = row.try_get("flags")?;
        let flags = u8::try_from(flags)
            .map(EmailChangeFlags::from_bits)
            .map_err(|_| StorageError::Corrupt(format!("flags out of range: {}", flags)))?;

        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            unconfirmed_email: row.try_get("unconfirmed_email")?,
            password_hash: row.try_get("password_hash")?,
            flags,
            scenario: Scenario::Default,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_token(&self, row: &SqliteRow) -> StorageResult<Token> {
        let kind: i64 = row.try_get("type")?;
        let kind = TokenKind::from_i64(kind)
            .ok_or_else(|| StorageError::Corrupt(format!("unknown token type: {}", kind)))?;

        Ok(Token {
            user_id: row.try_get("user_id")?,
            code: row.try_get("code")?,
            kind,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Field rules re-checked by the store for scenarios that accept user input
fn validate_for_scenario(user: &User) -> StorageResult<()> {
    match user.scenario {
        Scenario::Create | Scenario::Settings => {
            validate_username(&user.username)
                .map_err(|e| StorageError::Validation(e.render("Username")))?;
            validate_email(&user.email).map_err(|e| StorageError::Validation(e.render("Email")))?;
            if user.password_hash.is_empty() {
                return Err(StorageError::Validation(
                    "Password hash cannot be blank.".to_string(),
                ));
            }
            Ok(())
        }
        Scenario::Default => Ok(()),
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn find_by_id(&self, id: UserId) -> StorageResult<Option<User>> {
        debug!("Fetching user: {}", id);

        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_user(&row)).transpose()
    }

    async fn find_by_field(&self, field: UserField, value: &str) -> StorageResult<Option<User>> {
        debug!("Looking up user by {}", field);

        // Column names come from the UserField whitelist, values are bound
        let query = format!(
            "SELECT {} FROM users WHERE {} = ? LIMIT 1",
            USER_COLUMNS,
            field.column()
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_user(&row)).transpose()
    }

    async fn save(&self, user: &mut User) -> StorageResult<bool> {
        validate_for_scenario(user)?;

        match user.scenario {
            Scenario::Create => self.insert_user(user).await,
            Scenario::Default | Scenario::Settings => self.update_user(user).await,
        }
    }
}

#[async_trait]
impl TokenStore for SqliteStorage {
    async fn create_token(&self, token: &Token) -> StorageResult<()> {
        debug!(
            user_id = token.user_id,
            kind = ?token.kind,
            "Creating confirmation token"
        );

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM tokens WHERE user_id = ? AND type = ?")
            .bind(token.user_id)
            .bind(token.kind.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("INSERT INTO tokens (user_id, code, type, created_at) VALUES (?, ?, ?, ?)")
            .bind(token.user_id)
            .bind(&token.code)
            .bind(token.kind.as_i64())
            .bind(token.created_at)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from_write)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }

    async fn find_token(
        &self,
        user_id: UserId,
        code: &str,
        kinds: &[TokenKind],
    ) -> StorageResult<Option<Token>> {
        if kinds.is_empty() {
            return Ok(None);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT user_id, code, type, created_at FROM tokens WHERE user_id = ",
        );
        query_builder.push_bind(user_id);
        query_builder.push(" AND code = ");
        query_builder.push_bind(code);
        query_builder.push(" AND type IN (");
        let mut separated = query_builder.separated(", ");
        for kind in kinds {
            separated.push_bind(kind.as_i64());
        }
        separated.push_unseparated(") LIMIT 1");

        let row = query_builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_token(&row)).transpose()
    }

    async fn delete_token(&self, token: &Token) -> StorageResult<()> {
        sqlx::query("DELETE FROM tokens WHERE user_id = ? AND code = ? AND type = ?")
            .bind(token.user_id)
            .bind(&token.code)
            .bind(token.kind.as_i64())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(())
    }
}
