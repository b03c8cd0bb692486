// ABOUTME: Completion of a pending email change from a confirmation code
// ABOUTME: Secure changes need both the old and the new address confirmed

use tracing::{debug, info};
use usuario_config::EmailChangeStrategy;
use usuario_core::{EmailChangeFlags, Scenario, TokenKind, UserField, UserId};

use crate::i18n::CATEGORY_USER;
use crate::services::AccountServices;
use crate::SettingsResult;

pub const MSG_INVALID_TOKEN: &str = "Your confirmation token is invalid or expired";
pub const MSG_NOTHING_PENDING: &str = "There is no pending email change";
pub const MSG_EMAIL_TAKEN: &str = "This email address has already been taken";
pub const MSG_CONFIRM_OLD_NEXT: &str =
    "Awesome, almost there. Now you need to click the confirmation link sent to your old email address.";
pub const MSG_CONFIRM_NEW_NEXT: &str =
    "Awesome, almost there. Now you need to click the confirmation link sent to your new email address.";
pub const MSG_EMAIL_CHANGED: &str = "Your email address has been changed";
pub const MSG_NOT_APPLIED: &str = "Email changes are applied without confirmation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStatus {
    /// No matching token, or it expired
    InvalidToken,
    /// The user has no unconfirmed address
    NothingPending,
    /// Another account took the address in the meantime
    EmailTaken,
    /// One half of a secure change is confirmed
    PartiallyConfirmed,
    /// The unconfirmed address is now the primary one
    Changed,
    /// The active strategy does not use confirmation links; nothing changed
    NotApplied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfirmation {
    pub status: ConfirmStatus,
    pub notice: String,
    pub saved: bool,
}

pub struct EmailChangeConfirmation<'a> {
    services: &'a AccountServices,
}

impl<'a> EmailChangeConfirmation<'a> {
    pub fn new(services: &'a AccountServices) -> Self {
        Self { services }
    }

    fn finish(&self, status: ConfirmStatus, message: &str, saved: bool) -> EmailConfirmation {
        EmailConfirmation {
            status,
            notice: self.services.t(CATEGORY_USER, message),
            saved,
        }
    }

    pub async fn confirm(
        &self,
        user_id: UserId,
        code: &str,
    ) -> SettingsResult<EmailConfirmation> {
        let services = self.services;

        let token = services
            .tokens
            .find_token(user_id, code, &TokenKind::email_change())
            .await?;
        let token = match token {
            Some(token) if !token.is_expired(services.config.token_confirmation_lifespan) => token,
            Some(token) => {
                debug!(user_id, "Confirmation token expired");
                services.tokens.delete_token(&token).await?;
                return Ok(self.finish(ConfirmStatus::InvalidToken, MSG_INVALID_TOKEN, false));
            }
            None => {
                return Ok(self.finish(ConfirmStatus::InvalidToken, MSG_INVALID_TOKEN, false));
            }
        };
        services.tokens.delete_token(&token).await?;

        let Some(mut user) = services.users.find_by_id(user_id).await? else {
            return Ok(self.finish(ConfirmStatus::InvalidToken, MSG_INVALID_TOKEN, false));
        };

        let Some(new_email) = user.unconfirmed_email.clone() else {
            return Ok(self.finish(ConfirmStatus::NothingPending, MSG_NOTHING_PENDING, false));
        };

        if let Some(owner) = services
            .users
            .find_by_field(UserField::Email, &new_email)
            .await?
        {
            if owner.id != user.id {
                info!(user_id, "Pending email address was taken by another account");
                return Ok(self.finish(ConfirmStatus::EmailTaken, MSG_EMAIL_TAKEN, false));
            }
        }

        let strategy = services.config.email_change_strategy;
        let mut message = MSG_EMAIL_CHANGED;

        if strategy == EmailChangeStrategy::Secure {
            match token.kind {
                TokenKind::ConfirmNewEmail => {
                    user.flags.insert(EmailChangeFlags::NEW_EMAIL_CONFIRMED);
                    message = MSG_CONFIRM_OLD_NEXT;
                }
                TokenKind::ConfirmOldEmail => {
                    user.flags.insert(EmailChangeFlags::OLD_EMAIL_CONFIRMED);
                    message = MSG_CONFIRM_NEW_NEXT;
                }
                _ => {}
            }
        }

        let status = match strategy {
            EmailChangeStrategy::Default => ConfirmStatus::Changed,
            EmailChangeStrategy::Secure if user.flags.is_fully_confirmed() => {
                ConfirmStatus::Changed
            }
            EmailChangeStrategy::Secure => ConfirmStatus::PartiallyConfirmed,
            EmailChangeStrategy::Insecure => {
                // Changes apply at submission; a leftover link confirms nothing
                debug!(user_id, "Confirmation ignored under the insecure strategy");
                return Ok(self.finish(ConfirmStatus::NotApplied, MSG_NOT_APPLIED, false));
            }
        };

        if status == ConfirmStatus::Changed {
            user.email = new_email;
            user.unconfirmed_email = None;
            user.flags = EmailChangeFlags::NONE;
            message = MSG_EMAIL_CHANGED;
            info!(user_id, "Email address changed");
        }

        // Nothing user-submitted changed, so skip scenario validation
        user.scenario = Scenario::Default;
        let saved = services.users.save(&mut user).await?;

        Ok(self.finish(status, message, saved))
    }
}
