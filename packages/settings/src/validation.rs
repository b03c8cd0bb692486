// ABOUTME: Rule evaluation for the account settings form
// ABOUTME: Rules run in declaration order; a field with an error skips its remaining rules

use tracing::debug;
use usuario_core::{
    is_blank, validate_email, validate_new_password, validate_username, User, UserField,
    ValidationError,
};

use crate::i18n::{CATEGORY_RULES, CATEGORY_USER};
use crate::services::AccountServices;
use crate::types::{Field, FieldErrors, SettingsInput};
use crate::SettingsResult;

/// Translated label for a field
pub fn field_label(services: &AccountServices, field: Field) -> String {
    services.t(CATEGORY_USER, field.label())
}

/// Translated message for a rule failure on `field`
pub fn error_message(services: &AccountServices, field: Field, error: &ValidationError) -> String {
    let category = match error {
        ValidationError::CurrentPasswordInvalid => CATEGORY_USER,
        _ => CATEGORY_RULES,
    };
    let template = services.t(category, error.template());
    error.fill(&template, &field_label(services, field))
}

struct Reporter<'a> {
    services: &'a AccountServices,
    errors: &'a mut FieldErrors,
}

impl Reporter<'_> {
    fn report(&mut self, field: Field, error: ValidationError) {
        let message = error_message(self.services, field, &error);
        self.errors.add(field, message);
    }

    /// Later rules skip fields that already failed and empty values
    fn should_check(&self, field: Field, value: &str) -> bool {
        !self.errors.has(field) && !value.is_empty()
    }
}

/// Required check on the raw value, then trim in place
fn require_and_trim(reporter: &mut Reporter<'_>, field: Field, value: &mut String) {
    if is_blank(value) {
        reporter.report(field, ValidationError::Required);
    }
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Run every settings rule against `input` for the current `user`.
///
/// Trimming mutates `input`. Rule failures are added to `errors`; only store
/// failures are returned as `Err`.
pub async fn validate_settings(
    input: &mut SettingsInput,
    user: &User,
    services: &AccountServices,
    errors: &mut FieldErrors,
) -> SettingsResult<()> {
    let mut reporter = Reporter { services, errors };

    require_and_trim(&mut reporter, Field::Username, &mut input.username);
    if reporter.should_check(Field::Username, &input.username) {
        if let Err(e) = validate_username(&input.username) {
            reporter.report(Field::Username, e);
        }
    }

    require_and_trim(&mut reporter, Field::Email, &mut input.email);
    if reporter.should_check(Field::Email, &input.email) {
        if let Err(e) = validate_email(&input.email) {
            reporter.report(Field::Email, e);
        }
    }

    // Uniqueness is only checked for values that differ from the stored ones
    let unique_fields = [
        (Field::Email, UserField::Email, input.email.as_str()),
        (Field::Username, UserField::Username, input.username.as_str()),
    ];
    for (field, user_field, value) in unique_fields {
        if !reporter.should_check(field, value) || user.field(user_field) == value {
            continue;
        }
        if let Some(existing) = services.users.find_by_field(user_field, value).await? {
            if existing.id != user.id {
                debug!(field = %user_field, "Value already used by another account");
                reporter.report(
                    field,
                    ValidationError::Taken {
                        value: value.to_string(),
                    },
                );
            }
        }
    }

    if let Some(new_password) = input.new_password.as_deref() {
        if reporter.should_check(Field::NewPassword, new_password) {
            if let Err(e) = validate_new_password(new_password) {
                reporter.report(Field::NewPassword, e);
            }
        }
    }

    if is_blank(&input.current_password) {
        reporter.report(Field::CurrentPassword, ValidationError::Required);
    } else if !services
        .passwords
        .verify_password(&input.current_password, &user.password_hash)
    {
        reporter.report(Field::CurrentPassword, ValidationError::CurrentPasswordInvalid);
    }

    debug!(
        user_id = user.id,
        valid = reporter.errors.is_empty(),
        "Settings validation finished"
    );

    Ok(())
}
