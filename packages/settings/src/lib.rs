// ABOUTME: Account settings for Usuario: change username, email and password
// ABOUTME: Validation, email-change strategies and confirmation over narrow collaborator traits

pub mod email_change;
pub mod error;
pub mod form;
pub mod i18n;
pub mod identity;
pub mod mailer;
pub mod services;
pub mod types;
pub mod validation;

// Re-export main types
pub use email_change::{
    ConfirmStatus, EmailChange, EmailChangeConfirmation, EmailChangeOutcome, EmailConfirmation,
};
pub use error::{SettingsError, SettingsResult};
pub use form::SettingsForm;
pub use i18n::{MessageCatalog, Translator, Untranslated};
pub use identity::{FixedIdentity, IdentityProvider, StoredIdentity};
pub use mailer::{LogMailer, Mailer};
pub use services::AccountServices;
pub use types::{Field, FieldErrors, SettingsInput};
