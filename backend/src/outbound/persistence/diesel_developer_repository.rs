//! PostgreSQL-backed `DeveloperRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeveloperRepository, DeveloperRepositoryError};
use crate::domain::{Developer, DeveloperId, DeveloperName, EmailAddress, PasswordDigest};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{DeveloperRow, NewDeveloperRow};
use super::pool::{DbPool, PoolError};
use super::schema::developers;

/// Diesel-backed implementation of the `DeveloperRepository` port.
#[derive(Clone)]
pub struct DieselDeveloperRepository {
    pool: DbPool,
}

impl DieselDeveloperRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DeveloperRepositoryError {
    map_basic_pool_error(error, |message| {
        DeveloperRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> DeveloperRepositoryError {
    map_basic_diesel_error(
        error,
        DeveloperRepositoryError::query,
        DeveloperRepositoryError::connection,
    )
}

fn row_to_developer(row: DeveloperRow) -> Result<Developer, DeveloperRepositoryError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        DeveloperRepositoryError::query(format!("invalid developer email in database: {err}"))
    })?;
    let name = DeveloperName::new(&row.name).map_err(|err| {
        DeveloperRepositoryError::query(format!("invalid developer name in database: {err}"))
    })?;
    Ok(Developer {
        id: DeveloperId::from_uuid(row.id),
        email,
        name,
        company: row.company,
        password_digest: PasswordDigest::from_phc(row.password_hash),
        created_at: row.created_at,
        is_verified: row.is_verified,
    })
}

#[async_trait]
impl DeveloperRepository for DieselDeveloperRepository {
    async fn insert(&self, developer: &Developer) -> Result<(), DeveloperRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDeveloperRow {
            id: *developer.id.as_uuid(),
            email: developer.email.as_ref(),
            name: developer.name.as_ref(),
            company: developer.company.as_deref(),
            password_hash: developer.password_digest.as_phc(),
            is_verified: developer.is_verified,
            created_at: developer.created_at,
        };

        diesel::insert_into(developers::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    DeveloperRepositoryError::duplicate_email(developer.email.as_ref())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(
        &self,
        id: &DeveloperId,
    ) -> Result<Option<Developer>, DeveloperRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DeveloperRow> = developers::table
            .filter(developers::id.eq(id.as_uuid()))
            .select(DeveloperRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_developer).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Developer>, DeveloperRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DeveloperRow> = developers::table
            .filter(developers::email.eq(email.as_ref()))
            .select(DeveloperRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_developer).transpose()
    }
}
