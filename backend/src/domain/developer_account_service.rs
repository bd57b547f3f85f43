//! Developer registration and credential verification.
//!
//! Argon2 work runs on the blocking pool so request workers stay responsive.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::credentials::{hash_password, verify_password};
use super::ports::{DeveloperAccounts, DeveloperRepository};
use super::repository_errors::map_developer_error;
use super::{Developer, DeveloperId, Error, LoginCredentials, PasswordDigest, Registration};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service implementing [`DeveloperAccounts`].
#[derive(Clone)]
pub struct DeveloperAccountService<D> {
    developers: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<D> DeveloperAccountService<D> {
    pub fn new(developers: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self { developers, clock }
    }
}

async fn hash_blocking(password: String) -> Result<PasswordDigest, Error> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

async fn verify_blocking(password: String, digest: Option<PasswordDigest>) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || verify_password(&password, digest.as_ref()))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

#[async_trait]
impl<D> DeveloperAccounts for DeveloperAccountService<D>
where
    D: DeveloperRepository,
{
    async fn register(&self, registration: Registration) -> Result<Developer, Error> {
        if self
            .developers
            .find_by_email(registration.email())
            .await
            .map_err(map_developer_error)?
            .is_some()
        {
            return Err(Error::conflict("Developer already exists with this email"));
        }

        let password_digest = hash_blocking(registration.password().to_owned()).await?;
        let developer = Developer {
            id: DeveloperId::random(),
            email: registration.email().clone(),
            name: registration.name().clone(),
            company: registration.company().map(str::to_owned),
            password_digest,
            created_at: self.clock.utc(),
            is_verified: false,
        };
        // The unique email index settles concurrent registrations.
        self.developers
            .insert(&developer)
            .await
            .map_err(map_developer_error)?;
        info!(developer_id = %developer.id, "developer registered");
        Ok(developer)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Developer, Error> {
        let developer = self
            .developers
            .find_by_email(credentials.email())
            .await
            .map_err(map_developer_error)?;
        let digest = developer.as_ref().map(|d| d.password_digest.clone());
        let verified = verify_blocking(credentials.password().to_owned(), digest).await?;
        match developer {
            Some(developer) if verified => Ok(developer),
            _ => Err(Error::unauthorized(INVALID_CREDENTIALS)),
        }
    }

    async fn find(&self, id: &DeveloperId) -> Result<Option<Developer>, Error> {
        self.developers
            .find_by_id(id)
            .await
            .map_err(map_developer_error)
    }
}

#[cfg(test)]
#[path = "developer_account_service_tests.rs"]
mod tests;
