//! Port abstraction for app persistence and catalogue reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{App, AppId, AppStatus, DeveloperId, PaymentStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by app repository adapters.
    pub enum AppRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "app repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "app repository query failed: {message}",
    }
}

/// Storage for apps.
///
/// List operations return apps newest first (by `created_at`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Insert a newly submitted app.
    async fn insert(&self, app: &App) -> Result<(), AppRepositoryError>;

    /// Fetch an app by identifier.
    async fn find_by_id(&self, id: &AppId) -> Result<Option<App>, AppRepositoryError>;

    /// Persist developer-editable metadata of an existing app.
    ///
    /// Status, payment status, rating and downloads are left as stored so a
    /// concurrent moderation or download is never overwritten. Returns the
    /// stored app after the write, or `None` when it does not exist.
    async fn update_metadata(&self, app: &App) -> Result<Option<App>, AppRepositoryError>;

    /// Set the moderation status; returns the updated app.
    async fn set_status(
        &self,
        id: &AppId,
        status: AppStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<App>, AppRepositoryError>;

    /// Overwrite the app's payment status; returns the updated app.
    async fn set_payment_status(
        &self,
        id: &AppId,
        status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<App>, AppRepositoryError>;

    /// Atomically add one to the download counter.
    ///
    /// Returns `false` when the app does not exist.
    async fn increment_downloads(&self, id: &AppId) -> Result<bool, AppRepositoryError>;

    /// Apps whose status is `published`.
    async fn list_published(&self) -> Result<Vec<App>, AppRepositoryError>;

    /// Apps owned by `developer_id`, in any status.
    async fn list_by_developer(
        &self,
        developer_id: &DeveloperId,
    ) -> Result<Vec<App>, AppRepositoryError>;

    /// Every app.
    async fn list_all(&self) -> Result<Vec<App>, AppRepositoryError>;
}
