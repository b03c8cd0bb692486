// ABOUTME: Type definitions for the account settings form
// ABOUTME: Submitted input, form fields and accumulated field errors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use usuario_core::User;

/// Raw values submitted to the settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsInput {
    pub email: String,
    pub username: String,
    pub new_password: Option<String>,
    pub current_password: String,
}

impl SettingsInput {
    /// Prefill from the stored account; a pending address is shown in place of the current one
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user
                .unconfirmed_email
                .clone()
                .unwrap_or_else(|| user.email.clone()),
            username: user.username.clone(),
            new_password: None,
            current_password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Email,
    Username,
    NewPassword,
    CurrentPassword,
}

impl Field {
    /// Untranslated label
    pub fn label(&self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Username => "Username",
            Field::NewPassword => "New password",
            Field::CurrentPassword => "Current password",
        }
    }
}

/// Messages collected per field during validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn has(&self, field: Field) -> bool {
        self.0.get(&field).is_some_and(|messages| !messages.is_empty())
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn first(&self, field: Field) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_accumulate() {
        let mut errors = FieldErrors::default();
        assert!(errors.is_empty());

        errors.add(Field::Username, "Username is invalid.");
        errors.add(Field::Username, "Username \"bob\" has already been taken.");
        errors.add(Field::Email, "Email cannot be blank.");

        assert!(!errors.is_empty());
        assert!(errors.has(Field::Username));
        assert!(!errors.has(Field::NewPassword));
        assert_eq!(errors.get(Field::Username).len(), 2);
        assert_eq!(errors.first(Field::Email), Some("Email cannot be blank."));
        assert_eq!(errors.first(Field::CurrentPassword), None);
        assert_eq!(errors.iter().count(), 3);

        errors.clear();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_field_errors_serialize_by_field_name() {
        let mut errors = FieldErrors::default();
        errors.add(Field::CurrentPassword, "Current password is not valid");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json["current_password"][0],
            "Current password is not valid"
        );
    }

    #[test]
    fn test_input_from_user_prefers_pending_email() {
        let mut user = User::new("alice", "a@x.com", "hash");
        assert_eq!(SettingsInput::from_user(&user).email, "a@x.com");

        user.unconfirmed_email = Some("b@x.com".to_string());
        let input = SettingsInput::from_user(&user);
        assert_eq!(input.email, "b@x.com");
        assert_eq!(input.username, "alice");
        assert!(input.new_password.is_none());
    }
}
