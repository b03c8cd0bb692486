use thiserror::Error;
use usuario_config::ConfigError;
use usuario_core::ValidationError;
use usuario_security::PasswordError;
use usuario_settings::SettingsError;
use usuario_storage::StorageError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Could not read message catalog {path}: {source}")]
    MessagesIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid message catalog {path}: {source}")]
    MessagesFormat {
        path: String,
        source: serde_json::Error,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("User {0} not found")]
    UserNotFound(i64),
}

impl CliError {
    /// A field rule failure rendered with its label
    pub fn invalid(label: &str, error: ValidationError) -> Self {
        CliError::InvalidInput(error.render(label))
    }
}

pub type CliResult<T> = Result<T, CliError>;
