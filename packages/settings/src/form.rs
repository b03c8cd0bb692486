// ABOUTME: Account settings form: validate submitted changes, then persist them
// ABOUTME: Email changes are handed to the configured email-change strategy

use std::sync::Arc;

use tracing::{debug, info};
use usuario_core::{Scenario, User};

use crate::email_change::EmailChange;
use crate::identity::IdentityProvider;
use crate::services::AccountServices;
use crate::types::{Field, FieldErrors, SettingsInput};
use crate::validation::{field_label, validate_settings};
use crate::{SettingsError, SettingsResult};

/// One settings submission for the authenticated user.
///
/// The user is resolved at most once per form, either handed in with
/// [`SettingsForm::for_user`] or looked up through an [`IdentityProvider`]
/// on first use.
pub struct SettingsForm {
    input: SettingsInput,
    services: AccountServices,
    identity: Option<Arc<dyn IdentityProvider>>,
    user: Option<User>,
    errors: FieldErrors,
    notices: Vec<String>,
}

impl SettingsForm {
    pub fn new(
        services: AccountServices,
        identity: Arc<dyn IdentityProvider>,
        input: SettingsInput,
    ) -> Self {
        Self {
            input,
            services,
            identity: Some(identity),
            user: None,
            errors: FieldErrors::default(),
            notices: Vec::new(),
        }
    }

    pub fn for_user(services: AccountServices, user: User, input: SettingsInput) -> Self {
        Self {
            input,
            services,
            identity: None,
            user: Some(user),
            errors: FieldErrors::default(),
            notices: Vec::new(),
        }
    }

    pub fn email(&self) -> &str {
        &self.input.email
    }

    pub fn username(&self) -> &str {
        &self.input.username
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// User-facing messages produced by the last save
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn label(&self, field: Field) -> String {
        field_label(&self.services, field)
    }

    /// The form's user, resolved from the identity provider on first call
    pub async fn user(&mut self) -> SettingsResult<&User> {
        let user = self.resolve_user().await?;
        Ok(&*user)
    }

    async fn resolve_user(&mut self) -> SettingsResult<&mut User> {
        let user = match self.user.take() {
            Some(user) => user,
            None => {
                let identity = self
                    .identity
                    .as_ref()
                    .ok_or(SettingsError::NotAuthenticated)?;
                identity
                    .current_identity()
                    .await?
                    .ok_or(SettingsError::NotAuthenticated)?
            }
        };
        Ok(self.user.insert(user))
    }

    /// Run every rule; returns whether the input is valid
    pub async fn validate(&mut self) -> SettingsResult<bool> {
        self.resolve_user().await?;
        self.errors.clear();

        let Self {
            input,
            services,
            user,
            errors,
            ..
        } = self;
        let Some(user) = user.as_ref() else {
            return Err(SettingsError::NotAuthenticated);
        };
        validate_settings(input, user, services, errors).await?;

        Ok(self.errors.is_empty())
    }

    /// Validate and apply the submitted settings.
    ///
    /// Returns `Ok(false)` when validation fails (see [`Self::errors`]) or when
    /// the store or strategy reports failure. When the email is unchanged and
    /// no change is pending, nothing is persisted and `Ok(false)` is returned.
    pub async fn save(&mut self) -> SettingsResult<bool> {
        self.notices.clear();
        if !self.validate().await? {
            debug!("Settings rejected by validation");
            return Ok(false);
        }

        // Hash before touching the user so a hashing failure leaves it untouched
        let password_hash = match self.input.new_password.as_deref() {
            Some(password) if !password.is_empty() => {
                Some(self.services.passwords.hash_password(password)?)
            }
            _ => None,
        };

        let services = self.services.clone();
        let email = self.input.email.clone();
        let username = self.input.username.clone();
        let user = self.resolve_user().await?;

        user.scenario = Scenario::Settings;
        user.username = username;
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }

        if email == user.email && user.has_pending_email() {
            info!(user_id = user.id, "Cancelling pending email change");
            user.unconfirmed_email = None;
            return Ok(services.users.save(user).await?);
        }

        if email != user.email {
            let outcome = EmailChange::new(&services).run(user, &email).await?;
            self.notices.extend(outcome.notice);
            return Ok(outcome.saved);
        }

        debug!(
            user_id = user.id,
            "Email unchanged and nothing pending; settings not persisted"
        );
        Ok(false)
    }
}
