//! PostgreSQL-backed `AppRepository` implementation using Diesel ORM.
//!
//! Moderation, payment-status and download writes are single `UPDATE`
//! statements so concurrent requests never overwrite each other's fields.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AppRepository, AppRepositoryError};
use crate::domain::{
    App, AppCategory, AppDescription, AppId, AppName, AppStatus, AssetUrl, DeveloperId,
    PaymentId, PaymentStatus, Rating, Screenshots,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AppMetadataUpdate, AppRow, NewAppRow};
use super::pool::{DbPool, PoolError};
use super::schema::apps;

/// Diesel-backed implementation of the `AppRepository` port.
#[derive(Clone)]
pub struct DieselAppRepository {
    pool: DbPool,
}

impl DieselAppRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppRepositoryError {
    map_basic_pool_error(error, |message| AppRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> AppRepositoryError {
    map_basic_diesel_error(
        error,
        AppRepositoryError::query,
        AppRepositoryError::connection,
    )
}

fn parse_column<T: FromStr>(value: &str, column: &str) -> Result<T, AppRepositoryError>
where
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|err| {
        AppRepositoryError::query(format!("invalid {column} in database: {err}"))
    })
}

pub(super) fn row_to_app(row: AppRow) -> Result<App, AppRepositoryError> {
    let category: AppCategory = parse_column(&row.category, "category")?;
    let status: AppStatus = parse_column(&row.status, "status")?;
    let payment_status: PaymentStatus = parse_column(&row.payment_status, "payment_status")?;
    let rating = Rating::new(row.rating)
        .map_err(|err| AppRepositoryError::query(format!("invalid rating in database: {err}")))?;
    let downloads = u64::try_from(row.downloads)
        .map_err(|_| AppRepositoryError::query("negative download count in database"))?;

    Ok(App {
        id: AppId::from_uuid(row.id),
        name: AppName::from_stored(row.name),
        description: AppDescription::from_stored(row.description),
        category,
        logo_url: AssetUrl::from_stored(row.logo_url),
        download_url: AssetUrl::from_stored(row.download_url),
        screenshots: Screenshots::from_stored(row.screenshots),
        developer_id: DeveloperId::from_uuid(row.developer_id),
        developer_name: row.developer_name,
        status,
        payment_status,
        payment_id: row.payment_id.map(PaymentId::from_uuid),
        rating,
        downloads,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_apps(rows: Vec<AppRow>) -> Result<Vec<App>, AppRepositoryError> {
    rows.into_iter().map(row_to_app).collect()
}

#[async_trait]
impl AppRepository for DieselAppRepository {
    async fn insert(&self, app: &App) -> Result<(), AppRepositoryError> {
        let downloads = i64::try_from(app.downloads)
            .map_err(|_| AppRepositoryError::query("download count exceeds storage range"))?;
        let row = NewAppRow {
            id: *app.id.as_uuid(),
            name: app.name.as_ref(),
            description: app.description.as_ref(),
            category: app.category.as_str(),
            logo_url: app.logo_url.as_ref(),
            download_url: app.download_url.as_ref(),
            screenshots: app.screenshots.to_strings(),
            developer_id: *app.developer_id.as_uuid(),
            developer_name: &app.developer_name,
            status: app.status.as_str(),
            payment_status: app.payment_status.as_str(),
            payment_id: app.payment_id.map(|id| *id.as_uuid()),
            rating: app.rating.value(),
            downloads,
            created_at: app.created_at,
            updated_at: app.updated_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(apps::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &AppId) -> Result<Option<App>, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AppRow> = apps::table
            .filter(apps::id.eq(id.as_uuid()))
            .select(AppRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_app).transpose()
    }

    async fn update_metadata(&self, app: &App) -> Result<Option<App>, AppRepositoryError> {
        let changes = AppMetadataUpdate {
            name: app.name.as_ref(),
            description: app.description.as_ref(),
            category: app.category.as_str(),
            logo_url: app.logo_url.as_ref(),
            download_url: app.download_url.as_ref(),
            screenshots: app.screenshots.to_strings(),
            updated_at: app.updated_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AppRow> = diesel::update(apps::table.filter(apps::id.eq(app.id.as_uuid())))
            .set(&changes)
            .returning(AppRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_app).transpose()
    }

    async fn set_status(
        &self,
        id: &AppId,
        status: AppStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<App>, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AppRow> = diesel::update(apps::table.filter(apps::id.eq(id.as_uuid())))
            .set((apps::status.eq(status.as_str()), apps::updated_at.eq(now)))
            .returning(AppRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_app).transpose()
    }

    async fn set_payment_status(
        &self,
        id: &AppId,
        status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<App>, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AppRow> = diesel::update(apps::table.filter(apps::id.eq(id.as_uuid())))
            .set((
                apps::payment_status.eq(status.as_str()),
                apps::updated_at.eq(now),
            ))
            .returning(AppRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_app).transpose()
    }

    async fn increment_downloads(&self, id: &AppId) -> Result<bool, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(apps::table.filter(apps::id.eq(id.as_uuid())))
            .set(apps::downloads.eq(apps::downloads + 1_i64))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_published(&self) -> Result<Vec<App>, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AppRow> = apps::table
            .filter(apps::status.eq(AppStatus::Published.as_str()))
            .order(apps::created_at.desc())
            .select(AppRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_apps(rows)
    }

    async fn list_by_developer(
        &self,
        developer_id: &DeveloperId,
    ) -> Result<Vec<App>, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AppRow> = apps::table
            .filter(apps::developer_id.eq(developer_id.as_uuid()))
            .order(apps::created_at.desc())
            .select(AppRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_apps(rows)
    }

    async fn list_all(&self) -> Result<Vec<App>, AppRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AppRow> = apps::table
            .order(apps::created_at.desc())
            .select(AppRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_apps(rows)
    }
}
