//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{App, AppId, DeveloperId, Error};

/// Read-only catalogue views. Lists are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Published apps only.
    async fn list_published(&self) -> Result<Vec<App>, Error>;

    /// Every app owned by `developer_id`.
    async fn list_by_developer(&self, developer_id: &DeveloperId) -> Result<Vec<App>, Error>;

    /// Every app regardless of status.
    async fn list_all(&self) -> Result<Vec<App>, Error>;

    /// A single app, in any status.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the app does not exist.
    async fn get_app(&self, app_id: &AppId) -> Result<App, Error>;
}
