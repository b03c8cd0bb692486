// ABOUTME: Account operations behind the usuario subcommands
// ABOUTME: Registration and lookup on top of the shared account services

use tracing::info;
use usuario_core::{validate_email, validate_new_password, validate_username, User, UserId};
use usuario_settings::{AccountServices, Field};

use crate::error::{CliError, CliResult};

/// Register a new account with an already-confirmed email address
pub async fn create_user(
    services: &AccountServices,
    username: &str,
    email: &str,
    password: &str,
) -> CliResult<User> {
    let username = username.trim();
    let email = email.trim();

    validate_username(username).map_err(|e| CliError::invalid(Field::Username.label(), e))?;
    validate_email(email).map_err(|e| CliError::invalid(Field::Email.label(), e))?;
    validate_new_password(password).map_err(|e| CliError::invalid("Password", e))?;

    let hash = services.passwords.hash_password(password)?;
    let mut user = User::new(username, email, hash);
    services.users.save(&mut user).await?;

    info!(user_id = user.id, "Created user {}", user.username);
    Ok(user)
}

pub async fn find_user(services: &AccountServices, user_id: UserId) -> CliResult<User> {
    services
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(CliError::UserNotFound(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use usuario_config::ModuleConfig;
    use usuario_core::Scenario;
    use usuario_security::Argon2Passwords;
    use usuario_settings::LogMailer;
    use usuario_storage::{SqliteStorage, StorageError};

    async fn services() -> AccountServices {
        AccountServices::with_sqlite(
            SqliteStorage::in_memory().await.unwrap(),
            Arc::new(Argon2Passwords::with_params(1024, 1, 1).unwrap()),
            Arc::new(LogMailer::new("http://localhost")),
            ModuleConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let services = services().await;

        let user = create_user(&services, " alice ", "alice@example.com", "secret123")
            .await
            .unwrap();
        assert!(user.id > 0);
        assert_eq!(user.scenario, Scenario::Default);

        let found = find_user(&services, user.id).await.unwrap();
        assert_eq!(found.username, "alice");
        assert!(services
            .passwords
            .verify_password("secret123", &found.password_hash));
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_input() {
        let services = services().await;

        let err = create_user(&services, "al", "alice@example.com", "secret123")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Username should contain at least 3 characters."
        );

        let err = create_user(&services, "alice", "alice@example.com", "123")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password should contain at least 6 characters."
        );
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let services = services().await;
        create_user(&services, "alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        let err = create_user(&services, "ALICE", "other@example.com", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Storage(StorageError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let services = services().await;
        assert!(matches!(
            find_user(&services, 42).await,
            Err(CliError::UserNotFound(42))
        ));
    }
}
