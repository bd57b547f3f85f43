//! Port abstraction for developer account persistence.

use async_trait::async_trait;

use crate::domain::{Developer, DeveloperId, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by developer repository adapters.
    pub enum DeveloperRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "developer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "developer repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "developer already exists with email {email}",
    }
}

/// Storage for developer accounts keyed by id, with a unique email index.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeveloperRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`DeveloperRepositoryError::DuplicateEmail`] when the email
    /// is taken, even if two registrations race.
    async fn insert(&self, developer: &Developer) -> Result<(), DeveloperRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(
        &self,
        id: &DeveloperId,
    ) -> Result<Option<Developer>, DeveloperRepositoryError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Developer>, DeveloperRepositoryError>;
}
