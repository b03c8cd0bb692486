// ABOUTME: Outgoing mail seam for email-change confirmations
// ABOUTME: Default implementation writes the confirmation link to the log

use async_trait::async_trait;
use tracing::info;
use usuario_core::{Token, User};

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the link that confirms `to` as part of an email change.
    /// Returns whether the message was handed off.
    async fn send_reconfirmation(&self, user: &User, token: &Token, to: &str) -> bool;
}

/// Logs confirmation links instead of sending mail
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn confirmation_url(&self, token: &Token) -> String {
        format!(
            "{}/settings/confirm?id={}&code={}",
            self.base_url.trim_end_matches('/'),
            token.user_id,
            token.code
        )
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reconfirmation(&self, user: &User, token: &Token, to: &str) -> bool {
        info!(
            user_id = user.id,
            to = %to,
            kind = ?token.kind,
            url = %self.confirmation_url(token),
            "Email change confirmation"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usuario_core::TokenKind;

    #[test]
    fn test_confirmation_url() {
        let mailer = LogMailer::new("https://accounts.example.com/");
        let token = Token::new(7, TokenKind::ConfirmNewEmail, "abc123");

        assert_eq!(
            mailer.confirmation_url(&token),
            "https://accounts.example.com/settings/confirm?id=7&code=abc123"
        );
    }
}
