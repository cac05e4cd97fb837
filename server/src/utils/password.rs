//! Password hashing with argon2id
//!
//! Used for user passwords and OAuth client secrets. Hashes are PHC strings
//! with the salt embedded, so no separate salt column is needed.

use anyhow::{Result, anyhow};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext secret with argon2id and a random salt
pub fn hash(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a plaintext secret against a stored PHC hash string.
///
/// Returns false for malformed hashes rather than erroring, so a corrupted
/// credential row behaves like a wrong password.
pub fn verify(stored_hash: &str, plain: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("hunter2").unwrap();
        assert!(verify(&hashed, "hunter2"));
        assert!(!verify(&hashed, "hunter3"));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify(&a, "same-password"));
        assert!(verify(&b, "same-password"));
    }

    #[test]
    fn test_hash_not_plaintext() {
        let hashed = hash("secret456").unwrap();
        assert!(!hashed.contains("secret456"));
        assert!(hashed.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(!verify("not-a-phc-string", "anything"));
        assert!(!verify("", "anything"));
    }
}
