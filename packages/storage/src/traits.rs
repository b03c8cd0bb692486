use async_trait::async_trait;
use usuario_core::{Token, TokenKind, User, UserField, UserId};

use crate::StorageResult;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> StorageResult<Option<User>>;

    /// Exact lookup on a unique column (case-insensitive in SQLite)
    async fn find_by_field(&self, field: UserField, value: &str) -> StorageResult<Option<User>>;

    /// Persist the user according to its scenario.
    ///
    /// `Create` inserts and assigns `id`; other scenarios update the existing
    /// row and return `false` when no row matched.
    async fn save(&self, user: &mut User) -> StorageResult<bool>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store a token, replacing any earlier token of the same kind for that user
    async fn create_token(&self, token: &Token) -> StorageResult<()>;

    async fn find_token(
        &self,
        user_id: UserId,
        code: &str,
        kinds: &[TokenKind],
    ) -> StorageResult<Option<Token>>;

    async fn delete_token(&self, token: &Token) -> StorageResult<()>;
}
