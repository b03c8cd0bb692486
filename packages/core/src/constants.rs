/// Shortest accepted username, in characters
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Longest accepted username, in characters
pub const USERNAME_MAX_LENGTH: usize = 255;

/// Characters a username may contain
pub const USERNAME_PATTERN: &str = r"^[-a-zA-Z0-9_.@]+$";

/// Shortest accepted new password, in characters
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Longest accepted new password (bcrypt-compatible input limit)
pub const PASSWORD_MAX_LENGTH: usize = 72;

/// Length of generated confirmation codes
pub const TOKEN_CODE_LENGTH: usize = 32;

/// How long a confirmation token stays valid (24 hours)
pub const DEFAULT_TOKEN_LIFESPAN_SECS: u64 = 86_400;

/// Longest email address accepted (RFC 5321)
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Longest local part of an email address (RFC 5321)
pub const EMAIL_LOCAL_PART_MAX_LENGTH: usize = 64;
