//! Marketplace entry-point: reads configuration, prepares storage and serves.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use medstore::domain::ports::PaymentGateway;
use medstore::domain::TokenAdminAuthenticator;
use medstore::inbound::http::health::HealthState;
use medstore::inbound::http::session_config::{BuildMode, session_settings_from_env};
use medstore::outbound::paystack::PaystackGateway;
use medstore::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use medstore::seed::SeedSettings;
use medstore::settings::marketplace_settings_from_env;

use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mode = BuildMode::from_debug_assertions();
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, mode)
        .map_err(|e| startup_error("invalid session configuration", e))?;
    let settings = marketplace_settings_from_env(&env, mode)
        .map_err(|e| startup_error("invalid marketplace configuration", e))?;
    let seed = SeedSettings::load().map_err(|e| startup_error("invalid seed configuration", e))?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr,
    )
    .with_payment_flow(settings.payment_flow)
    .with_seed(seed);

    if let Some(token) = settings.admin_token {
        config = config.with_admin(TokenAdminAuthenticator::new(token));
    }

    if let Some(paystack) = settings.paystack {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(
            PaystackGateway::new(paystack)
                .map_err(|e| startup_error("failed to build Paystack client", e))?,
        );
        config = config.with_gateway(gateway);
    }

    if let Some(database_url) = settings.database_url {
        let applied = run_pending_migrations(&database_url)
            .await
            .map_err(|e| startup_error("database migrations failed", e))?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| startup_error("database pool setup failed", e))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(addr = %settings.bind_addr, "marketplace listening");
    server.await
}
