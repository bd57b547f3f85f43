//! Developer accounts.
//!
//! A developer owns submitted apps and pays their listing fees. Everything
//! except `is_verified` is fixed once the account is registered.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Minimum developer name length, counted in characters after trimming.
pub const DEVELOPER_NAME_MIN: usize = 2;

/// Validation errors for developer fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeveloperValidationError {
    /// The identifier was not a UUID.
    #[error("developer id must be a valid UUID")]
    InvalidId,
    /// The email address is structurally invalid.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// The name is shorter than [`DEVELOPER_NAME_MIN`].
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Required minimum.
        min: usize,
    },
}

/// Stable developer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeveloperId(Uuid);

impl DeveloperId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the textual form stored in sessions and URLs.
    pub fn parse(raw: &str) -> Result<Self, DeveloperValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| DeveloperValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DeveloperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalised email address: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use medstore::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Dev@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "dev@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: &str) -> Result<Self, DeveloperValidationError> {
        let normalised = raw.trim().to_lowercase();
        if is_plausible_email(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(DeveloperValidationError::InvalidEmail)
        }
    }
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Developer display name (at least two characters once trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperName(String);

impl DeveloperName {
    /// Validate and trim a developer name.
    pub fn new(raw: &str) -> Result<Self, DeveloperValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < DEVELOPER_NAME_MIN {
            return Err(DeveloperValidationError::NameTooShort {
                min: DEVELOPER_NAME_MIN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DeveloperName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Argon2 PHC string for a developer password. Never sent to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a stored PHC string.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string form.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Registered developer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    pub id: DeveloperId,
    pub email: EmailAddress,
    pub name: DeveloperName,
    pub company: Option<String>,
    pub password_digest: PasswordDigest,
    pub created_at: DateTime<Utc>,
    pub is_verified: bool,
}

/// Normalise an optional company name: blank values are treated as absent.
pub fn normalise_company(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
