// ABOUTME: Shared utility functions for Usuario
// ABOUTME: Random confirmation code generation

use rand::Rng;

/// URL-safe alphabet used for confirmation codes
const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Generate a random URL-safe code of `len` characters
pub fn generate_token_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOKEN_CODE_LENGTH;

    #[test]
    fn test_generate_token_code() {
        let code1 = generate_token_code(TOKEN_CODE_LENGTH);
        let code2 = generate_token_code(TOKEN_CODE_LENGTH);

        assert_eq!(code1.len(), TOKEN_CODE_LENGTH);
        assert_eq!(code2.len(), TOKEN_CODE_LENGTH);
        assert_ne!(code1, code2);

        // Codes end up in confirmation links, so only URL-safe characters
        assert!(code1
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generate_token_code_zero_length() {
        assert!(generate_token_code(0).is_empty());
    }
}
