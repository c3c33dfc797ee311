//! Password hashing for the direct-registration path.
//!
//! OTP remains the primary credential; a password hash exists only when
//! the caller supplied one at registration. Argon2id with a per-password
//! random salt and the library's fixed default cost.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a password for storage.
///
/// Returns a PHC-formatted string embedding algorithm, parameters, salt,
/// and digest.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(password: &str, hash_str: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash_str) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b, "salted hashes of the same password must differ");
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("secret-password").unwrap();
        assert!(!hash.contains("secret-password"));
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_garbage_hash_rejects() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
