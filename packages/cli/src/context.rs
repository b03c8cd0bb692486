// ABOUTME: Runtime wiring for the usuario binary
// ABOUTME: Reads the environment, opens the database and builds the account services

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use usuario_config::constants::{
    DEFAULT_BASE_URL, DEFAULT_DATABASE_URL, USUARIO_BASE_URL, USUARIO_DATABASE_URL,
    USUARIO_MESSAGES_FILE,
};
use usuario_config::ModuleConfig;
use usuario_security::Argon2Passwords;
use usuario_settings::{AccountServices, LogMailer, MessageCatalog, Translator};
use usuario_storage::SqliteStorage;

use crate::error::{CliError, CliResult};

/// Everything the binary needs to know before touching the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSettings {
    pub database_url: String,
    pub base_url: String,
    pub messages_file: Option<PathBuf>,
    pub module: ModuleConfig,
}

impl ContextSettings {
    pub fn from_env() -> CliResult<Self> {
        let database_url =
            env::var(USUARIO_DATABASE_URL).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let base_url = env::var(USUARIO_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let messages_file = env::var(USUARIO_MESSAGES_FILE)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_url,
            base_url,
            messages_file,
            module: ModuleConfig::from_env()?,
        })
    }
}

pub struct AppContext {
    pub storage: SqliteStorage,
    pub services: AccountServices,
}

impl AppContext {
    pub async fn open(settings: &ContextSettings) -> CliResult<Self> {
        let storage = SqliteStorage::connect(&settings.database_url).await?;
        info!(
            strategy = %settings.module.email_change_strategy,
            "Account database ready"
        );

        let mut services = AccountServices::with_sqlite(
            storage.clone(),
            Arc::new(Argon2Passwords::new()),
            Arc::new(LogMailer::new(settings.base_url.clone())),
            settings.module.clone(),
        );
        if let Some(path) = &settings.messages_file {
            services = services.with_translator(load_catalog(path)?);
        }

        Ok(Self { storage, services })
    }
}

fn load_catalog(path: &Path) -> CliResult<Arc<dyn Translator>> {
    let display = path.display().to_string();
    debug!("Loading message catalog from {}", path.display());

    let json = std::fs::read_to_string(path).map_err(|source| CliError::MessagesIo {
        path: display.clone(),
        source,
    })?;
    let catalog = MessageCatalog::from_json(&json).map_err(|source| CliError::MessagesFormat {
        path: display,
        source,
    })?;

    Ok(Arc::new(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::TempDir;
    use usuario_config::EmailChangeStrategy;
    use usuario_settings::i18n::CATEGORY_USER;
    use usuario_storage::UserStore;

    fn settings_in(dir: &TempDir) -> ContextSettings {
        ContextSettings {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display()),
            base_url: DEFAULT_BASE_URL.to_string(),
            messages_file: None,
            module: ModuleConfig::default(),
        }
    }

    #[test]
    #[serial]
    fn test_settings_from_env_defaults() {
        env::remove_var(USUARIO_DATABASE_URL);
        env::remove_var(USUARIO_BASE_URL);
        env::remove_var(USUARIO_MESSAGES_FILE);

        let settings = ContextSettings::from_env().unwrap();
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.messages_file, None);
    }

    #[test]
    #[serial]
    fn test_settings_from_env_overrides() {
        env::set_var(USUARIO_DATABASE_URL, "sqlite://other.db");
        env::set_var(USUARIO_BASE_URL, "https://accounts.example.com");
        env::set_var(USUARIO_MESSAGES_FILE, "/etc/usuario/fr.json");
        env::set_var("USUARIO_EMAIL_CHANGE_STRATEGY", "secure");

        let settings = ContextSettings::from_env();

        env::remove_var(USUARIO_DATABASE_URL);
        env::remove_var(USUARIO_BASE_URL);
        env::remove_var(USUARIO_MESSAGES_FILE);
        env::remove_var("USUARIO_EMAIL_CHANGE_STRATEGY");

        let settings = settings.unwrap();
        assert_eq!(settings.database_url, "sqlite://other.db");
        assert_eq!(settings.base_url, "https://accounts.example.com");
        assert_eq!(
            settings.messages_file,
            Some(PathBuf::from("/etc/usuario/fr.json"))
        );
        assert_eq!(
            settings.module.email_change_strategy,
            EmailChangeStrategy::Secure
        );
    }

    #[tokio::test]
    async fn test_open_creates_database() {
        let dir = TempDir::new().unwrap();
        let context = AppContext::open(&settings_in(&dir)).await.unwrap();

        assert!(dir.path().join("test.db").exists());
        assert!(context.storage.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_loads_message_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(&path, r#"{"user": {"Email": "Courriel"}}"#).unwrap();

        let mut settings = settings_in(&dir);
        settings.messages_file = Some(path);
        let context = AppContext::open(&settings).await.unwrap();

        assert_eq!(context.services.t(CATEGORY_USER, "Email"), "Courriel");
    }

    #[tokio::test]
    async fn test_open_rejects_malformed_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(&path, "not json").unwrap();

        let mut settings = settings_in(&dir);
        settings.messages_file = Some(path);

        assert!(matches!(
            AppContext::open(&settings).await,
            Err(CliError::MessagesFormat { .. })
        ));
    }
}
