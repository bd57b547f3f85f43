//! Catalogue read service.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{AppRepository, CatalogueQuery};
use super::repository_errors::map_app_error;
use super::{App, AppId, DeveloperId, Error};

/// Read-side service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueQueryService<A> {
    apps: Arc<A>,
}

impl<A> CatalogueQueryService<A> {
    pub fn new(apps: Arc<A>) -> Self {
        Self { apps }
    }
}

#[async_trait]
impl<A> CatalogueQuery for CatalogueQueryService<A>
where
    A: AppRepository,
{
    async fn list_published(&self) -> Result<Vec<App>, Error> {
        self.apps.list_published().await.map_err(map_app_error)
    }

    async fn list_by_developer(&self, developer_id: &DeveloperId) -> Result<Vec<App>, Error> {
        self.apps
            .list_by_developer(developer_id)
            .await
            .map_err(map_app_error)
    }

    async fn list_all(&self) -> Result<Vec<App>, Error> {
        self.apps.list_all().await.map_err(map_app_error)
    }

    async fn get_app(&self, app_id: &AppId) -> Result<App, Error> {
        self.apps
            .find_by_id(app_id)
            .await
            .map_err(map_app_error)?
            .ok_or_else(|| Error::not_found("App not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{AppRepositoryError, MockAppRepository};
    use crate::test_support::{sample_app, sample_developer};

    #[tokio::test]
    async fn get_app_maps_absence_to_not_found() {
        let mut repo = MockAppRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = CatalogueQueryService::new(Arc::new(repo))
            .get_app(&AppId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_published_passes_repository_order_through() {
        let developer = sample_developer();
        let apps = vec![sample_app(&developer), sample_app(&developer)];
        let expected: Vec<AppId> = apps.iter().map(|app| app.id).collect();
        let mut repo = MockAppRepository::new();
        repo.expect_list_published()
            .times(1)
            .return_once(move || Ok(apps));

        let listed = CatalogueQueryService::new(Arc::new(repo))
            .list_published()
            .await
            .expect("listed");
        assert_eq!(listed.iter().map(|app| app.id).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn query_failures_are_internal() {
        let mut repo = MockAppRepository::new();
        repo.expect_list_all()
            .return_once(|| Err(AppRepositoryError::query("syntax error")));

        let err = CatalogueQueryService::new(Arc::new(repo))
            .list_all()
            .await
            .expect_err("failed");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
