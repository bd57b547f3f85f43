//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminAuthenticator, CatalogueQuery, DeveloperAccounts, SubmissionLifecycle,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn DeveloperAccounts>,
    pub submissions: Arc<dyn SubmissionLifecycle>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub admin: Arc<dyn AdminAuthenticator>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use medstore::domain::ports::FixturePaymentGateway;
    /// use medstore::domain::{
    ///     CatalogueQueryService, DeveloperAccountService, SubmissionLifecycleService,
    ///     TokenAdminAuthenticator,
    /// };
    /// use medstore::inbound::http::state::HttpState;
    /// use medstore::outbound::memory::InMemoryMarketplaceStore;
    ///
    /// let store = Arc::new(InMemoryMarketplaceStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::new(
    ///     Arc::new(DeveloperAccountService::new(store.clone(), clock.clone())),
    ///     Arc::new(SubmissionLifecycleService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///         Arc::new(FixturePaymentGateway::succeeding()),
    ///         clock,
    ///     )),
    ///     Arc::new(CatalogueQueryService::new(store)),
    ///     Arc::new(TokenAdminAuthenticator::disabled()),
    /// );
    /// let _catalogue = state.catalogue.clone();
    /// ```
    pub fn new(
        accounts: Arc<dyn DeveloperAccounts>,
        submissions: Arc<dyn SubmissionLifecycle>,
        catalogue: Arc<dyn CatalogueQuery>,
        admin: Arc<dyn AdminAuthenticator>,
    ) -> Self {
        Self {
            accounts,
            submissions,
            catalogue,
            admin,
        }
    }
}
