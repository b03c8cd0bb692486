// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Usuario

// Account Module Configuration
pub const USUARIO_EMAIL_CHANGE_STRATEGY: &str = "USUARIO_EMAIL_CHANGE_STRATEGY";
pub const USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS: &str =
    "USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS";

// Database Configuration
pub const USUARIO_DATABASE_URL: &str = "USUARIO_DATABASE_URL";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://usuario.db?mode=rwc";

// Confirmation links and messages
pub const USUARIO_BASE_URL: &str = "USUARIO_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const USUARIO_MESSAGES_FILE: &str = "USUARIO_MESSAGES_FILE";
