//! Password hashing and verification with Argon2id.
//!
//! Stateless: the PHC string carries salt and parameters. Verification against
//! a missing account still runs one Argon2 check against a dummy digest so the
//! unknown-email and wrong-password paths cost the same.

use std::sync::OnceLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use super::developer::PasswordDigest;

const DUMMY_PASSWORD: &str = "medstore-dummy-password";

/// Errors raised while hashing a new password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct CredentialHashError {
    message: String,
}

/// Hash a password into an Argon2id PHC string with a random salt.
///
/// # Examples
/// ```
/// use medstore::domain::credentials::{hash_password, verify_password};
///
/// let digest = hash_password("secret1").unwrap();
/// assert!(verify_password("secret1", Some(&digest)));
/// assert!(!verify_password("secret2", Some(&digest)));
/// ```
pub fn hash_password(password: &str) -> Result<PasswordDigest, CredentialHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| CredentialHashError {
            message: err.to_string(),
        })?;
    Ok(PasswordDigest::from_phc(hash.to_string()))
}

/// Check `password` against a stored digest.
///
/// When `digest` is `None` the password is checked against a dummy digest and
/// the result is always `false`.
pub fn verify_password(password: &str, digest: Option<&PasswordDigest>) -> bool {
    match digest {
        Some(digest) => verify_phc(password, digest.as_phc()),
        None => {
            if let Some(dummy) = dummy_digest() {
                let _ = verify_phc(password, dummy.as_phc());
            }
            false
        }
    }
}

fn verify_phc(password: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn dummy_digest() -> Option<&'static PasswordDigest> {
    static DUMMY: OnceLock<Option<PasswordDigest>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password(DUMMY_PASSWORD).ok())
        .as_ref()
}
