// ABOUTME: Error types for the settings workflow
// ABOUTME: Infrastructure failures only; rule failures live on the form as field errors

use thiserror::Error;
use usuario_security::PasswordError;
use usuario_storage::StorageError;

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("No authenticated user")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordError),
}
