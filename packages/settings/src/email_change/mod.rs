// ABOUTME: Email-change strategies run by the settings form
// ABOUTME: Apply immediately, confirm the new address, or confirm both addresses

mod confirm;

pub use confirm::{ConfirmStatus, EmailChangeConfirmation, EmailConfirmation};

use tracing::{info, warn};
use usuario_config::EmailChangeStrategy;
use usuario_core::{
    generate_token_code, EmailChangeFlags, Token, TokenKind, User, TOKEN_CODE_LENGTH,
};

use crate::i18n::CATEGORY_USER;
use crate::services::AccountServices;
use crate::SettingsResult;

pub const MSG_ACCOUNT_UPDATED: &str = "Your account details have been updated";
pub const MSG_CONFIRM_NEW_EMAIL: &str =
    "A confirmation message has been sent to your new email address";
pub const MSG_CONFIRM_BOTH_EMAILS: &str = "We have sent confirmation links to both old and new email addresses. You must click both links to complete your request";

/// Result of running a strategy: whether the user was persisted, and what to tell them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailChangeOutcome {
    pub saved: bool,
    pub notice: Option<String>,
}

/// The configured strategy bound to the services it needs
pub struct EmailChange<'a> {
    strategy: EmailChangeStrategy,
    services: &'a AccountServices,
}

impl<'a> EmailChange<'a> {
    pub fn new(services: &'a AccountServices) -> Self {
        Self {
            strategy: services.config.email_change_strategy,
            services,
        }
    }

    pub fn with_strategy(strategy: EmailChangeStrategy, services: &'a AccountServices) -> Self {
        Self { strategy, services }
    }

    pub fn strategy(&self) -> EmailChangeStrategy {
        self.strategy
    }

    /// Change `user`'s address to `new_email`; the user is persisted by the strategy
    pub async fn run(
        &self,
        user: &mut User,
        new_email: &str,
    ) -> SettingsResult<EmailChangeOutcome> {
        info!(
            user_id = user.id,
            strategy = %self.strategy,
            "Running email change strategy"
        );

        match self.strategy {
            EmailChangeStrategy::Insecure => self.run_insecure(user, new_email).await,
            EmailChangeStrategy::Default => self.run_default(user, new_email).await,
            EmailChangeStrategy::Secure => self.run_secure(user, new_email).await,
        }
    }

    async fn run_insecure(
        &self,
        user: &mut User,
        new_email: &str,
    ) -> SettingsResult<EmailChangeOutcome> {
        user.email = new_email.to_string();

        let saved = self.services.users.save(user).await?;
        Ok(EmailChangeOutcome {
            saved,
            notice: saved.then(|| self.services.t(CATEGORY_USER, MSG_ACCOUNT_UPDATED)),
        })
    }

    async fn run_default(
        &self,
        user: &mut User,
        new_email: &str,
    ) -> SettingsResult<EmailChangeOutcome> {
        user.unconfirmed_email = Some(new_email.to_string());

        self.issue_token(user, TokenKind::ConfirmNewEmail, new_email).await?;

        let saved = self.services.users.save(user).await?;
        Ok(EmailChangeOutcome {
            saved,
            notice: saved.then(|| self.services.t(CATEGORY_USER, MSG_CONFIRM_NEW_EMAIL)),
        })
    }

    async fn run_secure(
        &self,
        user: &mut User,
        new_email: &str,
    ) -> SettingsResult<EmailChangeOutcome> {
        let outcome = self.run_default(user, new_email).await?;
        if !outcome.saved {
            return Ok(outcome);
        }

        let old_email = user.email.clone();
        self.issue_token(user, TokenKind::ConfirmOldEmail, &old_email).await?;

        // A new request starts over, whatever was confirmed before
        user.flags.remove(EmailChangeFlags::NEW_EMAIL_CONFIRMED);
        user.flags.remove(EmailChangeFlags::OLD_EMAIL_CONFIRMED);

        let saved = self.services.users.save(user).await?;
        Ok(EmailChangeOutcome {
            saved,
            notice: saved.then(|| self.services.t(CATEGORY_USER, MSG_CONFIRM_BOTH_EMAILS)),
        })
    }

    /// Store a fresh token and mail it; a failed send is logged, not fatal
    async fn issue_token(&self, user: &User, kind: TokenKind, to: &str) -> SettingsResult<Token> {
        let token = Token::new(user.id, kind, generate_token_code(TOKEN_CODE_LENGTH));
        self.services.tokens.create_token(&token).await?;

        if !self.services.mailer.send_reconfirmation(user, &token, to).await {
            warn!(
                user_id = user.id,
                kind = ?kind,
                "Failed to send email change confirmation"
            );
        }

        Ok(token)
    }
}
