//! In-process marketplace store.
//!
//! Developers, apps and payments share one `tokio::sync::RwLock`, so every
//! repository call that touches several records is atomic with respect to
//! other calls. Used when no database is configured and in tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{
    AppRepository, AppRepositoryError, DeveloperRepository, DeveloperRepositoryError,
    PaymentRepository, PaymentRepositoryError,
};
use crate::domain::{
    App, AppId, AppStatus, Developer, DeveloperId, EmailAddress, Payment, PaymentId,
    PaymentReference, PaymentSettlement, PaymentStatus,
};

#[derive(Debug, Default)]
struct StoreState {
    developers: HashMap<DeveloperId, Developer>,
    apps: HashMap<AppId, App>,
    payments: HashMap<PaymentId, Payment>,
}

/// Thread-safe in-memory implementation of every repository port.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMarketplaceStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryMarketplaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut apps: Vec<App>) -> Vec<App> {
    apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    apps
}

#[async_trait]
impl DeveloperRepository for InMemoryMarketplaceStore {
    async fn insert(&self, developer: &Developer) -> Result<(), DeveloperRepositoryError> {
        let mut state = self.state.write().await;
        if state
            .developers
            .values()
            .any(|existing| existing.email == developer.email)
        {
            return Err(DeveloperRepositoryError::duplicate_email(
                developer.email.as_ref(),
            ));
        }
        state.developers.insert(developer.id, developer.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DeveloperId,
    ) -> Result<Option<Developer>, DeveloperRepositoryError> {
        Ok(self.state.read().await.developers.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Developer>, DeveloperRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .developers
            .values()
            .find(|developer| &developer.email == email)
            .cloned())
    }
}

#[async_trait]
impl AppRepository for InMemoryMarketplaceStore {
    async fn insert(&self, app: &App) -> Result<(), AppRepositoryError> {
        self.state.write().await.apps.insert(app.id, app.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AppId) -> Result<Option<App>, AppRepositoryError> {
        Ok(self.state.read().await.apps.get(id).cloned())
    }

    async fn update_metadata(&self, app: &App) -> Result<Option<App>, AppRepositoryError> {
        let mut state = self.state.write().await;
        let Some(stored) = state.apps.get_mut(&app.id) else {
            return Ok(None);
        };
        stored.name = app.name.clone();
        stored.description = app.description.clone();
        stored.category = app.category;
        stored.logo_url = app.logo_url.clone();
        stored.download_url = app.download_url.clone();
        stored.screenshots = app.screenshots.clone();
        stored.updated_at = app.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn set_status(
        &self,
        id: &AppId,
        status: AppStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<App>, AppRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.apps.get_mut(id).map(|app| {
            app.status = status;
            app.updated_at = now;
            app.clone()
        }))
    }

    async fn set_payment_status(
        &self,
        id: &AppId,
        status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<App>, AppRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.apps.get_mut(id).map(|app| {
            app.payment_status = status;
            app.updated_at = now;
            app.clone()
        }))
    }

    async fn increment_downloads(&self, id: &AppId) -> Result<bool, AppRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state
            .apps
            .get_mut(id)
            .map(|app| app.downloads = app.downloads.saturating_add(1))
            .is_some())
    }

    async fn list_published(&self) -> Result<Vec<App>, AppRepositoryError> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .apps
                .values()
                .filter(|app| app.status == AppStatus::Published)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_developer(
        &self,
        developer_id: &DeveloperId,
    ) -> Result<Vec<App>, AppRepositoryError> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .apps
                .values()
                .filter(|app| app.is_owned_by(developer_id))
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<App>, AppRepositoryError> {
        let state = self.state.read().await;
        Ok(newest_first(state.apps.values().cloned().collect()))
    }
}

#[async_trait]
impl PaymentRepository for InMemoryMarketplaceStore {
    async fn record_attempt(
        &self,
        payment: &Payment,
        reset_failed_app: bool,
    ) -> Result<(), PaymentRepositoryError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        if state
            .payments
            .values()
            .any(|existing| existing.provider_reference == payment.provider_reference)
        {
            return Err(PaymentRepositoryError::duplicate_reference(
                payment.provider_reference.as_ref(),
            ));
        }
        let app = state
            .apps
            .get_mut(&payment.app_id)
            .ok_or_else(|| PaymentRepositoryError::missing(format!("app {}", payment.app_id)))?;
        app.payment_id = Some(payment.id);
        if reset_failed_app && app.payment_status == PaymentStatus::Failed {
            app.payment_status = PaymentStatus::Pending;
        }
        app.updated_at = payment.created_at;
        state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_provider_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .values()
            .find(|payment| &payment.provider_reference == reference)
            .cloned())
    }

    async fn list_for_app(&self, app_id: &AppId) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let state = self.state.read().await;
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|payment| &payment.app_id == app_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn settle(
        &self,
        settlement: &PaymentSettlement,
    ) -> Result<Payment, PaymentRepositoryError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let payment = state
            .payments
            .get_mut(&settlement.payment_id)
            .ok_or_else(|| {
                PaymentRepositoryError::missing(format!("payment {}", settlement.payment_id))
            })?;
        if payment.status == PaymentStatus::Completed {
            return Ok(payment.clone());
        }
        let app = state.apps.get_mut(&settlement.app_id).ok_or_else(|| {
            PaymentRepositoryError::missing(format!("app {}", settlement.app_id))
        })?;

        payment.status = settlement.outcome;
        payment.paid_at = settlement.paid_at;
        payment.updated_at = settlement.settled_at;
        if app.payment_status != PaymentStatus::Completed {
            app.payment_status = settlement.outcome;
            app.updated_at = settlement.settled_at;
        }
        Ok(payment.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::{fixture_timestamp, sample_app, sample_developer};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryMarketplaceStore {
        InMemoryMarketplaceStore::new()
    }

    async fn seeded(store: &InMemoryMarketplaceStore) -> App {
        let developer = sample_developer();
        DeveloperRepository::insert(store, &developer)
            .await
            .expect("developer stored");
        let app = sample_app(&developer);
        AppRepository::insert(store, &app).await.expect("app stored");
        app
    }

    fn attempt(app: &App) -> Payment {
        let reference = PaymentReference::generate(&app.id);
        Payment::initialised(
            app.id,
            app.developer_id,
            reference.clone(),
            reference,
            fixture_timestamp(),
        )
    }

    fn settlement(payment: &Payment, outcome: PaymentStatus) -> PaymentSettlement {
        PaymentSettlement {
            payment_id: payment.id,
            app_id: payment.app_id,
            outcome,
            paid_at: None,
            settled_at: fixture_timestamp(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_emails_are_rejected(store: InMemoryMarketplaceStore) {
        let first = sample_developer();
        let second = Developer {
            id: DeveloperId::random(),
            ..first.clone()
        };
        DeveloperRepository::insert(&store, &first)
            .await
            .expect("first stored");
        let err = DeveloperRepository::insert(&store, &second)
            .await
            .expect_err("duplicate");
        assert!(matches!(err, DeveloperRepositoryError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_downloads_are_all_counted(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                let id = app.id;
                tokio::spawn(async move { store.increment_downloads(&id).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.expect("join").expect("increment"));
        }
        let stored = AppRepository::find_by_id(&store, &app.id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.downloads, 50);
    }

    #[rstest]
    #[tokio::test]
    async fn recording_an_attempt_points_app_at_it(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        let payment = attempt(&app);
        store
            .record_attempt(&payment, false)
            .await
            .expect("recorded");

        let stored = AppRepository::find_by_id(&store, &app.id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.payment_id, Some(payment.id));
    }

    #[rstest]
    #[tokio::test]
    async fn settlement_updates_payment_and_app_together(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        let payment = attempt(&app);
        store.record_attempt(&payment, false).await.expect("recorded");

        let settled = store
            .settle(&settlement(&payment, PaymentStatus::Completed))
            .await
            .expect("settled");
        assert_eq!(settled.status, PaymentStatus::Completed);

        let stored = AppRepository::find_by_id(&store, &app.id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.payment_status, PaymentStatus::Completed);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_attempt_never_downgrades_completed_app(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        let paid = attempt(&app);
        let late = attempt(&app);
        store.record_attempt(&paid, false).await.expect("recorded");
        store.record_attempt(&late, false).await.expect("recorded");
        store
            .settle(&settlement(&paid, PaymentStatus::Completed))
            .await
            .expect("settled");

        let failed = store
            .settle(&settlement(&late, PaymentStatus::Failed))
            .await
            .expect("settled");
        assert_eq!(failed.status, PaymentStatus::Failed);

        let stored = AppRepository::find_by_id(&store, &app.id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.payment_status, PaymentStatus::Completed);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_payments_can_later_complete(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        let payment = attempt(&app);
        store.record_attempt(&payment, false).await.expect("recorded");
        store
            .settle(&settlement(&payment, PaymentStatus::Failed))
            .await
            .expect("settled");

        let confirmed = store
            .settle(&settlement(&payment, PaymentStatus::Completed))
            .await
            .expect("settled");
        assert_eq!(confirmed.status, PaymentStatus::Completed);
        let stored = AppRepository::find_by_id(&store, &app.id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.payment_status, PaymentStatus::Completed);
    }

    #[rstest]
    #[tokio::test]
    async fn completed_payments_are_final(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        let payment = attempt(&app);
        store.record_attempt(&payment, false).await.expect("recorded");
        store
            .settle(&settlement(&payment, PaymentStatus::Completed))
            .await
            .expect("settled");

        let again = store
            .settle(&settlement(&payment, PaymentStatus::Failed))
            .await
            .expect("settled");
        assert_eq!(again.status, PaymentStatus::Completed);
    }

    #[rstest]
    #[tokio::test]
    async fn published_listing_hides_other_statuses(store: InMemoryMarketplaceStore) {
        let app = seeded(&store).await;
        assert!(store.list_published().await.expect("list").is_empty());

        store
            .set_status(&app.id, AppStatus::Published, fixture_timestamp())
            .await
            .expect("updated");
        let published = store.list_published().await.expect("list");
        assert_eq!(published.len(), 1);

        store
            .set_status(&app.id, AppStatus::Rejected, fixture_timestamp())
            .await
            .expect("updated");
        assert!(store.list_published().await.expect("list").is_empty());
        assert_eq!(store.list_all().await.expect("list").len(), 1);
    }
}
