// ABOUTME: Module configuration for the account settings workflow
// ABOUTME: Parses the email-change strategy and token lifespan from the environment

pub mod constants;

use std::env;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use usuario_core::DEFAULT_TOKEN_LIFESPAN_SECS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid email change strategy: {0}. Must be one of: insecure (0), default (1), secure (2)")]
    InvalidEmailChangeStrategy(String),
    #[error("Invalid token lifespan: {0}")]
    InvalidLifespan(#[from] ParseIntError),
    #[error("Token lifespan must be greater than zero")]
    ZeroLifespan,
}

/// How a change of email address is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailChangeStrategy {
    /// Apply the new address immediately
    Insecure,
    /// Confirm via a link sent to the new address
    #[default]
    Default,
    /// Confirm via links sent to both the old and the new address
    Secure,
}

impl EmailChangeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailChangeStrategy::Insecure => "insecure",
            EmailChangeStrategy::Default => "default",
            EmailChangeStrategy::Secure => "secure",
        }
    }
}

impl fmt::Display for EmailChangeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailChangeStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "insecure" => Ok(EmailChangeStrategy::Insecure),
            "1" | "default" => Ok(EmailChangeStrategy::Default),
            "2" | "secure" => Ok(EmailChangeStrategy::Secure),
            _ => Err(ConfigError::InvalidEmailChangeStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    pub email_change_strategy: EmailChangeStrategy,
    pub token_confirmation_lifespan: Duration,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            email_change_strategy: EmailChangeStrategy::default(),
            token_confirmation_lifespan: Duration::from_secs(DEFAULT_TOKEN_LIFESPAN_SECS),
        }
    }
}

impl ModuleConfig {
    pub fn with_strategy(email_change_strategy: EmailChangeStrategy) -> Self {
        Self {
            email_change_strategy,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let email_change_strategy = match env::var(constants::USUARIO_EMAIL_CHANGE_STRATEGY) {
            Ok(value) => value.parse::<EmailChangeStrategy>()?,
            Err(_) => EmailChangeStrategy::default(),
        };

        let lifespan_secs = match env::var(constants::USUARIO_TOKEN_CONFIRMATION_LIFESPAN_SECS) {
            Ok(value) => value.trim().parse::<u64>()?,
            Err(_) => DEFAULT_TOKEN_LIFESPAN_SECS,
        };

        if lifespan_secs == 0 {
            return Err(ConfigError::ZeroLifespan);
        }

        debug!(
            strategy = %email_change_strategy,
            lifespan_secs,
            "Loaded account module configuration"
        );

        Ok(ModuleConfig {
            email_change_strategy,
            token_confirmation_lifespan: Duration::from_secs(lifespan_secs),
        })
    }
}
