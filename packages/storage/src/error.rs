use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid stored data: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Unique-constraint violations become `Duplicate`, everything else stays `Sqlx`
    pub fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Duplicate(db.message().to_string())
            }
            _ => StorageError::Sqlx(err),
        }
    }
}
