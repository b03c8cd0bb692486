// ABOUTME: Account type definitions
// ABOUTME: Users, persistence scenarios, email-change flags and confirmation tokens

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Mode tag telling the store which behavior applies on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Full update of an existing row
    #[default]
    Default,
    /// Insert of a new row
    Create,
    /// Full update after re-checking the user-editable fields
    Settings,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Default => "default",
            Scenario::Create => "create",
            Scenario::Settings => "settings",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which halves of a secure email change have been confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailChangeFlags(u8);

impl EmailChangeFlags {
    pub const NONE: Self = Self(0);
    pub const NEW_EMAIL_CONFIRMED: Self = Self(0b01);
    pub const OLD_EMAIL_CONFIRMED: Self = Self(0b10);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Both the old and the new address have been confirmed
    pub fn is_fully_confirmed(&self) -> bool {
        self.contains(Self::NEW_EMAIL_CONFIRMED) && self.contains(Self::OLD_EMAIL_CONFIRMED)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Pending new address awaiting confirmation
    pub unconfirmed_email: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub flags: EmailChangeFlags,
    #[serde(skip)]
    pub scenario: Scenario,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a user that has not been stored yet
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: username.into(),
            email: email.into(),
            unconfirmed_email: None,
            password_hash: password_hash.into(),
            flags: EmailChangeFlags::NONE,
            scenario: Scenario::Create,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_pending_email(&self) -> bool {
        self.unconfirmed_email.is_some()
    }

    /// Current stored value of a unique field
    pub fn field(&self, field: UserField) -> &str {
        match field {
            UserField::Username => &self.username,
            UserField::Email => &self.email,
        }
    }
}

/// User columns that can be looked up by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    Username,
    Email,
}

impl UserField {
    pub fn column(&self) -> &'static str {
        match self {
            UserField::Username => "username",
            UserField::Email => "email",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Confirmation,
    Recovery,
    ConfirmNewEmail,
    ConfirmOldEmail,
}

impl TokenKind {
    pub fn as_i64(&self) -> i64 {
        match self {
            TokenKind::Confirmation => 0,
            TokenKind::Recovery => 1,
            TokenKind::ConfirmNewEmail => 2,
            TokenKind::ConfirmOldEmail => 3,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(TokenKind::Confirmation),
            1 => Some(TokenKind::Recovery),
            2 => Some(TokenKind::ConfirmNewEmail),
            3 => Some(TokenKind::ConfirmOldEmail),
            _ => None,
        }
    }

    /// Token kinds that take part in an email change
    pub fn email_change() -> [TokenKind; 2] {
        [TokenKind::ConfirmNewEmail, TokenKind::ConfirmOldEmail]
    }
}

/// Single-use confirmation code bound to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub user_id: UserId,
    pub code: String,
    pub kind: TokenKind,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(user_id: UserId, kind: TokenKind, code: impl Into<String>) -> Self {
        Self {
            user_id,
            code: code.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// A token created in the future (clock skew) is never expired
    pub fn is_expired_at(&self, lifespan: Duration, now: DateTime<Utc>) -> bool {
        match (now - self.created_at).to_std() {
            Ok(elapsed) => elapsed > lifespan,
            Err(_) => false,
        }
    }

    pub fn is_expired(&self, lifespan: Duration) -> bool {
        self.is_expired_at(lifespan, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_email_change_flags() {
        let mut flags = EmailChangeFlags::NONE;
        assert!(!flags.is_fully_confirmed());

        flags.insert(EmailChangeFlags::NEW_EMAIL_CONFIRMED);
        assert!(flags.contains(EmailChangeFlags::NEW_EMAIL_CONFIRMED));
        assert!(!flags.is_fully_confirmed());

        flags.insert(EmailChangeFlags::OLD_EMAIL_CONFIRMED);
        assert!(flags.is_fully_confirmed());
        assert_eq!(flags.bits(), 0b11);

        flags.remove(EmailChangeFlags::NEW_EMAIL_CONFIRMED);
        assert_eq!(flags, EmailChangeFlags::OLD_EMAIL_CONFIRMED);
    }

    #[test]
    fn test_flags_from_bits_ignores_unknown() {
        assert_eq!(EmailChangeFlags::from_bits(0b111).bits(), 0b11);
    }

    #[test]
    fn test_token_kind_from_i64() {
        for kind in [
            TokenKind::Confirmation,
            TokenKind::Recovery,
            TokenKind::ConfirmNewEmail,
            TokenKind::ConfirmOldEmail,
        ] {
            assert_eq!(TokenKind::from_i64(kind.as_i64()), Some(kind));
        }
        assert_eq!(TokenKind::from_i64(42), None);
    }

    #[test]
    fn test_token_expiry() {
        let token = Token::new(1, TokenKind::ConfirmNewEmail, "code");
        let lifespan = Duration::from_secs(3600);

        assert!(!token.is_expired_at(lifespan, token.created_at));
        assert!(!token.is_expired_at(lifespan, token.created_at + ChronoDuration::minutes(59)));
        assert!(token.is_expired_at(lifespan, token.created_at + ChronoDuration::minutes(61)));
        assert!(!token.is_expired_at(lifespan, token.created_at - ChronoDuration::minutes(5)));
    }

    #[test]
    fn test_new_user_is_create_scenario() {
        let user = User::new("alice", "alice@example.com", "hash");
        assert_eq!(user.scenario, Scenario::Create);
        assert!(!user.has_pending_email());
        assert_eq!(user.field(UserField::Username), "alice");
        assert_eq!(user.field(UserField::Email), "alice@example.com");
    }
}
