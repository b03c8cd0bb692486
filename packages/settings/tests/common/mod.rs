// ABOUTME: Shared fixtures for settings integration tests
// ABOUTME: In-memory SQLite stores, cheap Argon2 parameters and a mocked mailer

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use sqlx::Row;
use usuario_config::{EmailChangeStrategy, ModuleConfig};
use usuario_core::{Token, TokenKind, User, UserId};
use usuario_security::Argon2Passwords;
use usuario_settings::{AccountServices, Mailer, SettingsInput};
use usuario_storage::{SqliteStorage, UserStore};

pub const PASSWORD: &str = "secret123";

mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_reconfirmation(&self, user: &User, token: &Token, to: &str) -> bool;
    }
}

pub fn fast_passwords() -> Arc<Argon2Passwords> {
    Arc::new(Argon2Passwords::with_params(1024, 1, 1).unwrap())
}

/// Mailer that must never be used
pub fn silent_mailer() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_send_reconfirmation().never();
    mailer
}

/// Mailer that accepts any number of messages
pub fn accepting_mailer() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_send_reconfirmation().return_const(true);
    mailer
}

pub struct Harness {
    pub storage: SqliteStorage,
    pub services: AccountServices,
}

pub async fn harness(strategy: EmailChangeStrategy, mailer: MockMailer) -> Harness {
    harness_with_config(ModuleConfig::with_strategy(strategy), mailer).await
}

pub async fn harness_with_config(config: ModuleConfig, mailer: MockMailer) -> Harness {
    let storage = SqliteStorage::in_memory().await.unwrap();
    let services = AccountServices::with_sqlite(
        storage.clone(),
        fast_passwords(),
        Arc::new(mailer),
        config,
    );
    Harness { storage, services }
}

impl Harness {
    pub async fn create_user(&self, username: &str, email: &str) -> User {
        let hash = self.services.passwords.hash_password(PASSWORD).unwrap();
        let mut user = User::new(username, email, hash);
        assert!(self.storage.save(&mut user).await.unwrap());
        user
    }

    pub async fn reload(&self, user_id: UserId) -> User {
        self.storage.find_by_id(user_id).await.unwrap().unwrap()
    }

    pub async fn token_codes(&self, user_id: UserId, kind: TokenKind) -> Vec<String> {
        sqlx::query("SELECT code FROM tokens WHERE user_id = ? AND type = ?")
            .bind(user_id)
            .bind(kind.as_i64())
            .fetch_all(self.storage.pool())
            .await
            .unwrap()
            .iter()
            .map(|row| row.get::<String, _>("code"))
            .collect()
    }
}

pub fn input(username: &str, email: &str, current_password: &str) -> SettingsInput {
    SettingsInput {
        email: email.to_string(),
        username: username.to_string(),
        new_password: None,
        current_password: current_password.to_string(),
    }
}
