// ABOUTME: Password security for Usuario
// ABOUTME: Provides Argon2id password hashing and verification behind a narrow trait

pub mod password;

// Re-export main types for convenience
pub use password::{Argon2Passwords, PasswordError, PasswordService};
