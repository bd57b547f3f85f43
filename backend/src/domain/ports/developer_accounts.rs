//! Driving port for developer registration and sign-in.
//!
//! Inbound adapters call this port to create accounts and check credentials
//! without touching the password hasher or the account store directly.

use async_trait::async_trait;

use crate::domain::{Developer, DeveloperId, Error, LoginCredentials, Registration};

/// Account use-cases for developers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeveloperAccounts: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `conflict` when the email is already registered.
    async fn register(&self, registration: Registration) -> Result<Developer, Error>;

    /// Check credentials and return the matching account.
    ///
    /// Unknown emails and wrong passwords produce the same `unauthorized`
    /// error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Developer, Error>;

    /// Look up an account by identifier.
    async fn find(&self, id: &DeveloperId) -> Result<Option<Developer>, Error>;
}
