// ABOUTME: Password hashing using Argon2id with PHC-formatted hashes
// ABOUTME: Verification never errors: malformed stored hashes simply fail to verify

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, ParamsBuilder, Version};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password cannot be empty")]
    Empty,

    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

/// Hashes new passwords and checks submitted ones against stored hashes
pub trait PasswordService: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError>;

    /// Returns false for a wrong password and for an unparseable hash
    fn verify_password(&self, password: &str, stored_hash: &str) -> bool;
}

pub struct Argon2Passwords {
    argon2: Argon2<'static>,
}

impl Argon2Passwords {
    /// Argon2id with the crate's recommended parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with explicit memory (KiB), iteration and parallelism costs
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(m_cost)
            .t_cost(t_cost)
            .p_cost(p_cost)
            .build()
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Passwords {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2Passwords {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        // Parameters come from the stored hash, so older hashes keep verifying
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
