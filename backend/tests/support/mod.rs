//! Shared wiring for HTTP integration tests.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, init_service, read_body_json};
use actix_web::{App, web};
use medstore::Trace;
use medstore::domain::ports::FixturePaymentGateway;
use medstore::domain::{
    AdminToken, CatalogueQueryService, DeveloperAccountService, SubmissionLifecycleService,
    TokenAdminAuthenticator,
};
use medstore::inbound::http::state::HttpState;
use medstore::inbound::http::{configure, json_config};
use medstore::outbound::memory::InMemoryMarketplaceStore;
use mockable::DefaultClock;
use serde_json::{Value, json};

pub const ADMIN_TOKEN: &str = "integration-admin-token-0123456789";

/// Memory-backed state using `gateway` and the real clock.
pub fn marketplace_state(gateway: FixturePaymentGateway) -> HttpState {
    let store = Arc::new(InMemoryMarketplaceStore::new());
    let clock = Arc::new(DefaultClock);
    HttpState::new(
        Arc::new(DeveloperAccountService::new(store.clone(), clock.clone())),
        Arc::new(SubmissionLifecycleService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(gateway),
            clock,
        )),
        Arc::new(CatalogueQueryService::new(store)),
        Arc::new(TokenAdminAuthenticator::new(
            AdminToken::new(ADMIN_TOKEN).expect("valid token"),
        )),
    )
}

/// Initialise the `/api` service the way the server mounts it.
pub async fn marketplace(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .wrap(Trace)
            .service(web::scope("/api").wrap(session).configure(configure)),
    )
    .await
}

/// Send `req` and decode the JSON body after checking the status.
pub async fn expect_json<S>(app: &S, req: Request, status: StatusCode) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = call_service(app, req).await;
    assert_eq!(res.status(), status);
    read_body_json(res).await
}

/// Register and sign in, returning the session cookie.
pub async fn signed_in<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let register = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password, "name": "Dana Dev" }))
        .to_request();
    expect_json(app, register, StatusCode::CREATED).await;

    let login = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let res = call_service(app, login).await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

pub fn app_payload(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Revision questions for nursing students",
        "category": "Medical Education",
        "logoUrl": "https://cdn.example.com/foo/logo.png",
        "downloadUrl": "https://cdn.example.com/foo/foo.apk",
        "screenshots": [
            "https://cdn.example.com/foo/1.png",
            "https://cdn.example.com/foo/2.png",
            "https://cdn.example.com/foo/3.png",
            "https://cdn.example.com/foo/4.png"
        ],
    })
}
