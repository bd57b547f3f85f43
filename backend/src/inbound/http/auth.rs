//! Developer account handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"d@x.com","password":"secret1","name":"Dana Dev"}
//! POST /api/auth/login {"email":"d@x.com","password":"secret1"}
//! POST /api/auth/logout
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DeveloperResponse, ErrorSchema, MessageResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_validation_error;

/// Registration body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "d@x.com")]
    pub email: String,
    /// At least six characters.
    pub password: String,
    #[schema(example = "Dana Dev")]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// Login body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "d@x.com")]
    pub email: String,
    pub password: String,
}

/// Create a developer account. Does not sign the developer in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Developer registered", body = DeveloperResponse),
        (status = 400, description = "Invalid registration data", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
        company,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&email, &password, &name, company.as_deref())
        .map_err(|err| credentials_validation_error(&err))?;
    let developer = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(DeveloperResponse::from(developer)))
}

/// Verify credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = DeveloperResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<DeveloperResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| credentials_validation_error(&err))?;
    let developer = state.accounts.authenticate(&credentials).await?;
    session.persist_developer(&developer.id)?;
    info!(developer_id = %developer.id, "developer signed in");
    Ok(web::Json(developer.into()))
}

/// End the session. Succeeds without one.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<MessageResponse> {
    session.purge();
    web::Json(MessageResponse::new("Logged out successfully"))
}

/// The signed-in developer.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current developer", body = DeveloperResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentDeveloper"
)]
#[get("/auth/me")]
pub async fn current_developer(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DeveloperResponse>> {
    let developer_id = session.require_developer_id()?;
    let developer = state
        .accounts
        .find(&developer_id)
        .await?
        .ok_or_else(|| Error::not_found("Developer not found"))?;
    Ok(web::Json(developer.into()))
}
