//! Marketplace settings read from the environment.
//!
//! Session cookie toggles live in [`crate::inbound::http::session_config`];
//! this module covers binding, storage, payments and administration. Debug
//! builds fall back to the fixture payment gateway when no Paystack key is
//! configured; release builds refuse to start without one.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use mockable::Env;
use tracing::warn;
use url::Url;

use crate::domain::{AdminToken, AdminTokenError, PaymentFlowSettings, PaymentRetryPolicy};
use crate::inbound::http::session_config::BuildMode;
use crate::outbound::paystack::PaystackConfig;

const BIND_ADDR_ENV: &str = "MARKETPLACE_BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const PAYSTACK_SECRET_ENV: &str = "PAYSTACK_SECRET_KEY";
const PAYSTACK_BASE_URL_ENV: &str = "PAYSTACK_BASE_URL";
const PAYSTACK_TIMEOUT_ENV: &str = "PAYSTACK_TIMEOUT_SECS";
const FRONTEND_URL_ENV: &str = "FRONTEND_URL";
const RETRY_POLICY_ENV: &str = "PAYMENT_RETRY_POLICY";
const ADMIN_TOKEN_ENV: &str = "ADMIN_TOKEN";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5000";
const CALLBACK_PATH: &str = "/payment/callback";

/// Everything the server needs beyond session cookies.
///
/// Not `Debug`: it carries the Paystack secret and database credentials.
pub struct MarketplaceSettings {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// `None` selects the fixture gateway (debug builds only).
    pub paystack: Option<PaystackConfig>,
    pub payment_flow: PaymentFlowSettings,
    /// `None` disables the admin endpoints.
    pub admin_token: Option<AdminToken>,
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid ADMIN_TOKEN: {0}")]
    AdminToken(#[from] AdminTokenError),
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> SettingsError {
    SettingsError::InvalidEnv {
        name,
        value: value.to_owned(),
        expected,
    }
}

/// Non-blank value of `name`.
fn read<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Load [`MarketplaceSettings`] from `env`.
///
/// # Examples
///
/// ```rust
/// use medstore::inbound::http::session_config::BuildMode;
/// use medstore::settings::marketplace_settings_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "MARKETPLACE_BIND_ADDR" => Some("127.0.0.1:9000".to_owned()),
///     _ => None,
/// });
///
/// let settings = marketplace_settings_from_env(&env, BuildMode::Debug).unwrap();
/// assert_eq!(settings.bind_addr.port(), 9000);
/// assert!(settings.database_url.is_none());
/// assert!(settings.paystack.is_none());
/// ```
pub fn marketplace_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<MarketplaceSettings, SettingsError> {
    let bind_raw = read(env, BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    let bind_addr = SocketAddr::from_str(&bind_raw)
        .map_err(|_| invalid(BIND_ADDR_ENV, &bind_raw, "host:port"))?;

    Ok(MarketplaceSettings {
        bind_addr,
        database_url: read(env, DATABASE_URL_ENV),
        paystack: paystack_from_env(env, mode)?,
        payment_flow: payment_flow_from_env(env)?,
        admin_token: admin_token_from_env(env)?,
    })
}

fn paystack_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<PaystackConfig>, SettingsError> {
    let Some(secret) = read(env, PAYSTACK_SECRET_ENV) else {
        if mode == BuildMode::Release {
            return Err(SettingsError::MissingEnv {
                name: PAYSTACK_SECRET_ENV,
            });
        }
        warn!("PAYSTACK_SECRET_KEY not set; payments use the fixture gateway");
        return Ok(None);
    };

    let mut config = PaystackConfig::new(secret)
        .map_err(|_| invalid(PAYSTACK_BASE_URL_ENV, "<default>", "an absolute URL"))?;
    if let Some(raw) = read(env, PAYSTACK_BASE_URL_ENV) {
        config.base_url =
            Url::parse(&raw).map_err(|_| invalid(PAYSTACK_BASE_URL_ENV, &raw, "an absolute URL"))?;
    }
    if let Some(raw) = read(env, PAYSTACK_TIMEOUT_ENV) {
        let secs = raw
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| invalid(PAYSTACK_TIMEOUT_ENV, &raw, "a positive number of seconds"))?;
        config.timeout = Duration::from_secs(secs);
    }
    Ok(Some(config))
}

fn payment_flow_from_env<E: Env>(env: &E) -> Result<PaymentFlowSettings, SettingsError> {
    let frontend = read(env, FRONTEND_URL_ENV).unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned());
    Url::parse(&frontend).map_err(|_| invalid(FRONTEND_URL_ENV, &frontend, "an absolute URL"))?;
    let callback_url = format!("{}{CALLBACK_PATH}", frontend.trim_end_matches('/'));

    let retry_policy = match read(env, RETRY_POLICY_ENV) {
        Some(raw) => PaymentRetryPolicy::from_str(&raw)
            .map_err(|_| invalid(RETRY_POLICY_ENV, &raw, "allow|allow-and-reset|deny"))?,
        None => PaymentRetryPolicy::default(),
    };

    Ok(PaymentFlowSettings {
        retry_policy,
        callback_url,
    })
}

fn admin_token_from_env<E: Env>(env: &E) -> Result<Option<AdminToken>, SettingsError> {
    match read(env, ADMIN_TOKEN_ENV) {
        Some(raw) => Ok(Some(AdminToken::new(&raw)?)),
        None => {
            warn!("ADMIN_TOKEN not set; admin endpoints are disabled");
            Ok(None)
        }
    }
}
