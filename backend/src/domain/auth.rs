//! Authentication inputs: login credentials and developer registrations.
//!
//! Constructors validate raw strings so handlers never pass unchecked input to
//! a port. Passwords are held in [`Zeroizing`] buffers.

use zeroize::Zeroizing;

use super::developer::{DeveloperName, DeveloperValidationError, EmailAddress, normalise_company};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum.
        min: usize,
    },
    /// Name shorter than the developer minimum.
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Required minimum.
        min: usize,
    },
}

impl CredentialsValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::NameTooShort { .. } => "name",
        }
    }

    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::NameTooShort { .. } => "name_too_short",
        }
    }
}

impl From<DeveloperValidationError> for CredentialsValidationError {
    fn from(value: DeveloperValidationError) -> Self {
        match value {
            DeveloperValidationError::NameTooShort { min } => Self::NameTooShort { min },
            DeveloperValidationError::InvalidEmail | DeveloperValidationError::InvalidId => {
                Self::InvalidEmail
            }
        }
    }
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use medstore::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" D@X.com ", "secret1").unwrap();
/// assert_eq!(creds.email().as_ref(), "d@x.com");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email).map_err(|_| CredentialsValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password exactly as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated developer registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    name: DeveloperName,
    company: Option<String>,
}

impl Registration {
    /// Validate a registration payload.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
        company: Option<&str>,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email).map_err(|_| CredentialsValidationError::InvalidEmail)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let name = DeveloperName::new(name)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            name,
            company: normalise_company(company),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn name(&self) -> &DeveloperName {
        &self.name
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }
}
