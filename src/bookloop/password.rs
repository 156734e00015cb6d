//! Argon2id password hashing and verification.
//!
//! Hashes are stored as PHC strings, which embed the algorithm parameters and the random
//! salt. Entries written before hashing was introduced hold the bare password; those are
//! still accepted, compared in constant time, and flagged so the directory can rehash them.

use crate::error::{BookloopError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2};
use subtle::ConstantTimeEq;

/// Outcome of checking a password against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Mismatch,
    Match,
    /// Matched a legacy plain-text entry that should be rehashed.
    MatchNeedsRehash,
}

impl Verification {
    pub fn is_match(self) -> bool {
        !matches!(self, Verification::Mismatch)
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BookloopError::PasswordHash(e.to_string()))
}

/// Check a plaintext password against what the users document holds.
pub fn verify_password(password: &str, stored: &str) -> Result<Verification> {
    let Some(parsed) = parse_hash(stored) else {
        let equal: bool = password.as_bytes().ct_eq(stored.as_bytes()).into();
        return Ok(if equal {
            Verification::MatchNeedsRehash
        } else {
            Verification::Mismatch
        });
    };

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(Verification::Match),
        Err(argon2::password_hash::Error::Password) => Ok(Verification::Mismatch),
        Err(e) => Err(BookloopError::PasswordHash(e.to_string())),
    }
}

pub fn is_hashed(stored: &str) -> bool {
    parse_hash(stored).is_some()
}

/// A stored value counts as a hash only if it is an Argon2 PHC string carrying a hash.
/// Anything else, including plain text that happens to start with `$`, is legacy.
fn parse_hash(stored: &str) -> Option<PasswordHash<'_>> {
    PasswordHash::new(stored)
        .ok()
        .filter(|parsed| Algorithm::try_from(parsed.algorithm).is_ok() && parsed.hash.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(is_hashed(&hash));
        assert_eq!(
            verify_password("correct-horse", &hash).unwrap(),
            Verification::Match
        );
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").unwrap();
        assert_eq!(
            verify_password("wrong-password", &hash).unwrap(),
            Verification::Mismatch
        );
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn test_legacy_plain_text() {
        assert!(!is_hashed("hunter2"));
        assert_eq!(
            verify_password("hunter2", "hunter2").unwrap(),
            Verification::MatchNeedsRehash
        );
        assert_eq!(
            verify_password("hunter3", "hunter2").unwrap(),
            Verification::Mismatch
        );
        assert!(!verify_password("", "hunter2").unwrap().is_match());
    }

    #[test]
    fn test_dollar_prefixed_plain_text_is_legacy() {
        for stored in ["$ecret", "$pbkdf2$notreally", "$argon2id$v=19$m=19456,t=2,p=1"] {
            assert!(!is_hashed(stored), "{} should not count as a hash", stored);
            assert_eq!(
                verify_password(stored, stored).unwrap(),
                Verification::MatchNeedsRehash
            );
        }
    }
}
