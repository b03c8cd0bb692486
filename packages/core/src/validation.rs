// ABOUTME: Input validation for account fields
// ABOUTME: Username, email and password rules shared by every account form

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::constants::{
    EMAIL_LOCAL_PART_MAX_LENGTH, EMAIL_MAX_LENGTH, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
    USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH, USERNAME_PATTERN,
};

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("USERNAME_PATTERN is a valid regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?\.)+[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?$",
    )
    .expect("EMAIL_REGEX is a valid regex")
});

/// Rule failures for a single field.
///
/// The display text is a message template: `{attribute}` is replaced with the
/// (translated) field label by whoever reports the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{{attribute}} cannot be blank.")]
    Required,

    #[error("{{attribute}} should contain at least {min} characters.")]
    TooShort { min: usize },

    #[error("{{attribute}} should contain at most {max} characters.")]
    TooLong { max: usize },

    #[error("{{attribute}} is invalid.")]
    InvalidFormat,

    #[error("{{attribute}} is not a valid email address.")]
    InvalidEmail,

    #[error("{{attribute}} \"{value}\" has already been taken.")]
    Taken { value: String },

    #[error("Current password is not valid")]
    CurrentPasswordInvalid,
}

impl ValidationError {
    /// Untranslated source message; placeholders are left in place
    pub fn template(&self) -> &'static str {
        match self {
            ValidationError::Required => "{attribute} cannot be blank.",
            ValidationError::TooShort { .. } => {
                "{attribute} should contain at least {min} characters."
            }
            ValidationError::TooLong { .. } => {
                "{attribute} should contain at most {max} characters."
            }
            ValidationError::InvalidFormat => "{attribute} is invalid.",
            ValidationError::InvalidEmail => "{attribute} is not a valid email address.",
            ValidationError::Taken { .. } => "{attribute} \"{value}\" has already been taken.",
            ValidationError::CurrentPasswordInvalid => "Current password is not valid",
        }
    }

    /// Placeholder values other than `{attribute}`
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            ValidationError::TooShort { min } => vec![("min", min.to_string())],
            ValidationError::TooLong { max } => vec![("max", max.to_string())],
            ValidationError::Taken { value } => vec![("value", value.clone())],
            _ => Vec::new(),
        }
    }

    /// Fill a (possibly translated) template with the label and this error's values
    pub fn fill(&self, template: &str, label: &str) -> String {
        self.params().into_iter().fold(
            template.replace("{attribute}", label),
            |message, (name, value)| message.replace(&format!("{{{}}}", name), &value),
        )
    }

    /// Render the untranslated message with the given field label
    pub fn render(&self, label: &str) -> String {
        self.fill(self.template(), label)
    }
}

/// Empty or whitespace-only input
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Length is counted in characters, not bytes
fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { min });
    }
    if len > max {
        return Err(ValidationError::TooLong { max });
    }
    Ok(())
}

/// Validate an already-trimmed, non-empty username
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    validate_length(value, USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH)?;

    if !USERNAME_REGEX.is_match(value) {
        return Err(ValidationError::InvalidFormat);
    }

    Ok(())
}

/// Validate an already-trimmed, non-empty email address
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.len() > EMAIL_MAX_LENGTH {
        return Err(ValidationError::InvalidEmail);
    }

    let Some((local, _domain)) = value.rsplit_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };

    if local.len() > EMAIL_LOCAL_PART_MAX_LENGTH || !EMAIL_REGEX.is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a non-empty new password; no strength policy beyond length
pub fn validate_new_password(value: &str) -> Result<(), ValidationError> {
    validate_length(value, PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH)
}
