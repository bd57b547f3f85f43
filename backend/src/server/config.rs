//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use medstore::domain::ports::{FixturePaymentGateway, PaymentGateway};
use medstore::domain::{PaymentFlowSettings, TokenAdminAuthenticator};
use medstore::outbound::persistence::DbPool;
use medstore::seed::SeedSettings;

/// Builder-style configuration for creating the HTTP server.
///
/// Defaults to the in-memory store, the fixture gateway and disabled admin
/// endpoints.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) gateway: Arc<dyn PaymentGateway>,
    pub(crate) payment_flow: PaymentFlowSettings,
    pub(crate) admin: TokenAdminAuthenticator,
    pub(crate) seed: Option<SeedSettings>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            gateway: Arc::new(FixturePaymentGateway::succeeding()),
            payment_flow: PaymentFlowSettings::default(),
            admin: TokenAdminAuthenticator::disabled(),
            seed: None,
        }
    }

    /// Use Diesel repositories backed by `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    #[must_use]
    pub fn with_payment_flow(mut self, payment_flow: PaymentFlowSettings) -> Self {
        self.payment_flow = payment_flow;
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin: TokenAdminAuthenticator) -> Self {
        self.admin = admin;
        self
    }

    /// Seed demo data into the selected store before serving.
    #[must_use]
    pub fn with_seed(mut self, seed: SeedSettings) -> Self {
        self.seed = Some(seed);
        self
    }
}
