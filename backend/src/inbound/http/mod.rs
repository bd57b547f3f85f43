//! HTTP inbound adapter exposing the marketplace REST endpoints under `/api`.

pub mod admin;
pub mod apps;
pub mod auth;
pub mod error;
pub mod health;
pub mod payments;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// Register every `/api` handler on `cfg`.
///
/// Mount inside a scope carrying the session middleware:
///
/// ```ignore
/// App::new().service(web::scope("/api").wrap(session).configure(configure))
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_developer)
        .service(apps::list_published_apps)
        .service(apps::create_app)
        .service(apps::get_app)
        .service(apps::update_app)
        .service(apps::record_download)
        .service(apps::list_developer_apps)
        .service(payments::initialize_payment)
        .service(payments::verify_payment)
        .service(admin::list_all_apps)
        .service(admin::set_app_status)
        .service(admin::reconcile_payment);
}

/// JSON extractor settings that report malformed bodies as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error_handler)
}
