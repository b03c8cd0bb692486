// ABOUTME: Core account types and field validation rules for Usuario
// ABOUTME: Foundational package shared by the storage, security and settings packages

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{EmailChangeFlags, Scenario, Token, TokenKind, User, UserField, UserId};

// Re-export constants
pub use constants::{
    DEFAULT_TOKEN_LIFESPAN_SECS, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, TOKEN_CODE_LENGTH,
    USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
};

// Re-export utilities
pub use utils::generate_token_code;

// Re-export validation
pub use validation::{
    is_blank, validate_email, validate_new_password, validate_username, ValidationError,
};
