//! Administrator credential checks for moderation endpoints.
//!
//! The configured token is kept only as a SHA-256 digest. Presented tokens are
//! hashed and compared in constant time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::Error;
use super::ports::AdminAuthenticator;

/// Minimum administrator token length.
pub const ADMIN_TOKEN_MIN: usize = 32;

/// Errors raised when the configured administrator token is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminTokenError {
    #[error("admin token must be at least {min} characters")]
    TooShort { min: usize },
}

/// Configured administrator token.
pub struct AdminToken(Zeroizing<String>);

impl AdminToken {
    pub fn new(raw: &str) -> Result<Self, AdminTokenError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < ADMIN_TOKEN_MIN {
            return Err(AdminTokenError::TooShort {
                min: ADMIN_TOKEN_MIN,
            });
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }
}

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken(..)")
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn digests_match(expected: &[u8; 32], presented: &[u8; 32]) -> bool {
    expected.ct_eq(presented).into()
}

/// Bearer-token authenticator. Without a token, administration is disabled.
///
/// # Examples
/// ```
/// use medstore::domain::{AdminToken, TokenAdminAuthenticator};
/// use medstore::domain::ports::AdminAuthenticator;
///
/// let token = "0123456789abcdef0123456789abcdef";
/// let auth = TokenAdminAuthenticator::new(AdminToken::new(token).unwrap());
/// assert!(auth.authorize(Some(token)).is_ok());
/// assert!(auth.authorize(Some("wrong")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenAdminAuthenticator {
    expected: Option<[u8; 32]>,
}

impl TokenAdminAuthenticator {
    pub fn new(token: AdminToken) -> Self {
        Self {
            expected: Some(digest(token.0.as_str())),
        }
    }

    /// Authenticator that refuses every request with `403`.
    pub fn disabled() -> Self {
        Self::default()
    }
}

impl AdminAuthenticator for TokenAdminAuthenticator {
    fn authorize(&self, bearer: Option<&str>) -> Result<(), Error> {
        let Some(expected) = self.expected.as_ref() else {
            return Err(Error::forbidden("administration is disabled"));
        };
        let Some(presented) = bearer.map(str::trim).filter(|token| !token.is_empty()) else {
            return Err(Error::unauthorized("administrator token required"));
        };
        if digests_match(expected, &digest(presented)) {
            Ok(())
        } else {
            Err(Error::unauthorized("invalid administrator token"))
        }
    }
}
