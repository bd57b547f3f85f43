//! Builders wiring repositories and services into [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use medstore::domain::ports::{AppRepository, DeveloperRepository, PaymentRepository};
use medstore::domain::{CatalogueQueryService, DeveloperAccountService, SubmissionLifecycleService};
use medstore::inbound::http::state::HttpState;
use medstore::outbound::memory::InMemoryMarketplaceStore;
use medstore::outbound::persistence::{
    DieselAppRepository, DieselDeveloperRepository, DieselPaymentRepository,
};
use medstore::seed::seed_demo_data;

use super::ServerConfig;

/// Select the store from `config`, seed it if asked, and build the services.
///
/// # Errors
///
/// Returns [`std::io::Error`] when seeding fails.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "marketplace store selected");
            assemble(
                Arc::new(DieselDeveloperRepository::new(pool.clone())),
                Arc::new(DieselAppRepository::new(pool.clone())),
                Arc::new(DieselPaymentRepository::new(pool.clone())),
                config,
            )
            .await
        }
        None => {
            info!(store = "memory", "marketplace store selected; data is lost on restart");
            let store = Arc::new(InMemoryMarketplaceStore::new());
            assemble(store.clone(), store.clone(), store, config).await
        }
    }
}

async fn assemble<D, A, P>(
    developers: Arc<D>,
    apps: Arc<A>,
    payments: Arc<P>,
    config: &ServerConfig,
) -> std::io::Result<HttpState>
where
    D: DeveloperRepository + 'static,
    A: AppRepository + 'static,
    P: PaymentRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    if let Some(seed) = &config.seed {
        seed_demo_data(seed, developers.as_ref(), apps.as_ref(), clock.as_ref())
            .await
            .map_err(|err| std::io::Error::other(format!("demo seeding failed: {err}")))?;
    }

    let submissions = SubmissionLifecycleService::new(
        developers.clone(),
        apps.clone(),
        payments,
        config.gateway.clone(),
        clock.clone(),
    )
    .with_settings(config.payment_flow.clone());

    Ok(HttpState::new(
        Arc::new(DeveloperAccountService::new(developers, clock)),
        Arc::new(submissions),
        Arc::new(CatalogueQueryService::new(apps)),
        Arc::new(config.admin.clone()),
    ))
}
