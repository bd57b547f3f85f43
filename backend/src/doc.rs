//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` route plus the health probes, the
//! request and response DTOs, and two security schemes: the developer session
//! cookie and the administrator bearer token. Swagger UI serves it at
//! `/docs` in debug builds.

use crate::inbound::http::admin::StatusUpdateRequest;
use crate::inbound::http::apps::{CreateAppRequest, UpdateAppRequest};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::payments::{InitializePaymentRequest, VerifyPaymentRequest};
use crate::inbound::http::schemas::{
    AppResponse, DeveloperResponse, ErrorCodeSchema, ErrorSchema, MessageResponse,
    PaymentInitializationResponse, PaymentResponse, PaymentVerificationResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
        components.add_security_scheme(
            "AdminToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Value of the ADMIN_TOKEN environment variable."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the marketplace API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "MedStore marketplace API",
        description = "Developer accounts, app submissions, listing-fee payments and moderation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_developer,
        crate::inbound::http::apps::list_published_apps,
        crate::inbound::http::apps::get_app,
        crate::inbound::http::apps::record_download,
        crate::inbound::http::apps::list_developer_apps,
        crate::inbound::http::apps::create_app,
        crate::inbound::http::apps::update_app,
        crate::inbound::http::payments::initialize_payment,
        crate::inbound::http::payments::verify_payment,
        crate::inbound::http::admin::list_all_apps,
        crate::inbound::http::admin::set_app_status,
        crate::inbound::http::admin::reconcile_payment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageResponse,
        DeveloperResponse,
        AppResponse,
        PaymentResponse,
        PaymentInitializationResponse,
        PaymentVerificationResponse,
        RegisterRequest,
        LoginRequest,
        CreateAppRequest,
        UpdateAppRequest,
        InitializePaymentRequest,
        VerifyPaymentRequest,
        StatusUpdateRequest,
    )),
    tags(
        (name = "auth", description = "Developer registration and sessions"),
        (name = "apps", description = "Catalogue and app submissions"),
        (name = "payments", description = "Listing-fee checkout and verification"),
        (name = "admin", description = "Moderation, bearer token required"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
