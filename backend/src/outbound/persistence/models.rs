//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{apps, developers, payments};

/// Row struct for reading from the developers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = developers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeveloperRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    pub password_hash: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new developer accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = developers)]
pub(crate) struct NewDeveloperRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub company: Option<&'a str>,
    pub password_hash: &'a str,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// App models
// ---------------------------------------------------------------------------

/// Row struct for reading from the apps table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = apps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub logo_url: String,
    pub download_url: String,
    pub screenshots: Vec<String>,
    pub developer_id: Uuid,
    pub developer_name: String,
    pub status: String,
    pub payment_status: String,
    pub payment_id: Option<Uuid>,
    pub rating: f64,
    pub downloads: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for newly submitted apps.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = apps)]
pub(crate) struct NewAppRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub logo_url: &'a str,
    pub download_url: &'a str,
    pub screenshots: Vec<String>,
    pub developer_id: Uuid,
    pub developer_name: &'a str,
    pub status: &'a str,
    pub payment_status: &'a str,
    pub payment_id: Option<Uuid>,
    pub rating: f64,
    pub downloads: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for developer-editable app metadata.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = apps)]
pub(crate) struct AppMetadataUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub logo_url: &'a str,
    pub download_url: &'a str,
    pub screenshots: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Payment models
// ---------------------------------------------------------------------------

/// Row struct for reading from the payments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub app_id: Uuid,
    pub developer_id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub reference: String,
    pub paystack_reference: String,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new payment attempts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub app_id: Uuid,
    pub developer_id: Uuid,
    pub amount: i32,
    pub currency: &'a str,
    pub reference: &'a str,
    pub paystack_reference: &'a str,
    pub status: &'a str,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
