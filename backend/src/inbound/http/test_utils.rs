//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service};
use actix_web::{App, web};
use serde_json::{Value, json};

use crate::domain::ports::{
    FixturePaymentGateway, MockCatalogueQuery, MockDeveloperAccounts, MockSubmissionLifecycle,
    PaymentGateway,
};
use crate::domain::{
    AdminToken, CatalogueQueryService, DeveloperAccountService, PaymentFlowSettings,
    SubmissionLifecycleService, TokenAdminAuthenticator,
};
use crate::outbound::memory::InMemoryMarketplaceStore;
use crate::middleware::Trace;
use crate::test_support::fixture_clock;

use super::state::HttpState;
use super::{configure, json_config};

/// Administrator token accepted by [`memory_state`].
pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789abcdef";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Handler state backed by a fresh in-memory store and `gateway`.
pub fn memory_state(gateway: impl PaymentGateway + 'static) -> HttpState {
    let store = Arc::new(InMemoryMarketplaceStore::new());
    let clock = fixture_clock();
    let submissions = SubmissionLifecycleService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(gateway),
        clock.clone(),
    )
    .with_settings(PaymentFlowSettings::default());
    HttpState::new(
        Arc::new(DeveloperAccountService::new(store.clone(), clock)),
        Arc::new(submissions),
        Arc::new(CatalogueQueryService::new(store)),
        Arc::new(TokenAdminAuthenticator::new(
            AdminToken::new(ADMIN_TOKEN).expect("valid test token"),
        )),
    )
}

/// [`memory_state`] with a gateway that confirms every checkout.
pub fn paying_state() -> HttpState {
    memory_state(FixturePaymentGateway::succeeding())
}

/// Handler state whose driving ports are the given mocks.
///
/// Administration is disabled.
pub fn mocked_state(
    accounts: MockDeveloperAccounts,
    submissions: MockSubmissionLifecycle,
    catalogue: MockCatalogueQuery,
) -> HttpState {
    HttpState::new(
        Arc::new(accounts),
        Arc::new(submissions),
        Arc::new(catalogue),
        Arc::new(TokenAdminAuthenticator::disabled()),
    )
}

/// App with every `/api` route, the test session middleware and `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .wrap(Trace)
        .service(web::scope("/api").configure(configure))
}

/// Register `email` with password `secret1`, sign in and return the cookie.
pub async fn sign_in<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let register = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": "secret1", "name": "Dana Dev" }))
        .to_request();
    let res = call_service(app, register).await;
    assert_eq!(res.status(), StatusCode::CREATED, "registration succeeds");

    let login = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "secret1" }))
        .to_request();
    let res = call_service(app, login).await;
    assert_eq!(res.status(), StatusCode::OK, "login succeeds");
    session_cookie(&res).expect("session cookie")
}

/// Four distinct screenshot URLs.
pub fn screenshots(count: usize) -> Vec<String> {
    crate::test_support::screenshot_urls(count)
}

/// A valid `POST /api/apps` body named `name`.
pub fn app_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Flashcards for clinical pharmacology",
        "category": "Pharmacy",
        "logoUrl": "https://cdn.example.com/logo.png",
        "downloadUrl": "https://apps.example.com/foo.apk",
        "screenshots": screenshots(4),
    })
}

/// Submit [`app_body`] as the holder of `cookie` and return the new app id.
pub async fn submit_app<S>(app: &S, cookie: Cookie<'static>, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/apps")
        .cookie(cookie)
        .set_json(app_body(name))
        .to_request();
    let res = call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "submission succeeds");
    let created: Value = actix_web::test::read_body_json(res).await;
    created["id"].as_str().expect("app id").to_owned()
}
