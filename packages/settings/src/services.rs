// ABOUTME: Collaborators shared by the settings form, strategies and confirmation
// ABOUTME: Built once at startup and cloned cheaply into each request

use std::sync::Arc;

use usuario_config::ModuleConfig;
use usuario_security::PasswordService;
use usuario_storage::{SqliteStorage, TokenStore, UserStore};

use crate::i18n::{Translator, Untranslated};
use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AccountServices {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub passwords: Arc<dyn PasswordService>,
    pub mailer: Arc<dyn Mailer>,
    pub translator: Arc<dyn Translator>,
    pub config: ModuleConfig,
}

impl AccountServices {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        passwords: Arc<dyn PasswordService>,
        mailer: Arc<dyn Mailer>,
        config: ModuleConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
            mailer,
            translator: Arc::new(Untranslated),
            config,
        }
    }

    /// Both stores backed by the same SQLite database
    pub fn with_sqlite(
        storage: SqliteStorage,
        passwords: Arc<dyn PasswordService>,
        mailer: Arc<dyn Mailer>,
        config: ModuleConfig,
    ) -> Self {
        let storage = Arc::new(storage);
        Self::new(storage.clone(), storage, passwords, mailer, config)
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn t(&self, category: &str, message: &str) -> String {
        self.translator.translate(category, message)
    }
}
