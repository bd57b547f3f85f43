//! App catalogue and submission handlers.
//!
//! ```text
//! GET  /api/apps
//! GET  /api/apps/{id}
//! POST /api/apps/{id}/download
//! GET  /api/developer/apps
//! POST /api/apps {"name":"Foo","description":"...","category":"Pharmacy",...}
//! PUT  /api/apps/{id} {"name":"Foo 2"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    AppCategory, AppDescription, AppName, AppSubmission, AppUpdate, AppValidationError,
    AssetUrl, Screenshots, UrlField,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AppResponse, ErrorSchema, MessageResponse, app_list};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{app_validation_error, parse_app_id};

/// Submission body for `POST /api/apps`.
///
/// Missing fields deserialise as empty and fail validation with the field
/// name, so clients get one error shape for absent and malformed input.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAppRequest {
    #[schema(example = "Foo")]
    pub name: String,
    pub description: String,
    #[schema(example = "Medical Education")]
    pub category: String,
    pub logo_url: String,
    pub download_url: String,
    /// Exactly four absolute URLs.
    pub screenshots: Vec<String>,
}

impl TryFrom<CreateAppRequest> for AppSubmission {
    type Error = AppValidationError;

    fn try_from(value: CreateAppRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: AppName::new(&value.name)?,
            description: AppDescription::new(&value.description)?,
            category: value.category.parse::<AppCategory>()?,
            logo_url: AssetUrl::new(&value.logo_url, UrlField::Logo)?,
            download_url: AssetUrl::new(&value.download_url, UrlField::Download)?,
            screenshots: Screenshots::new(&value.screenshots)?,
        })
    }
}

/// Partial edit body for `PUT /api/apps/{id}`.
///
/// Moderation and payment fields are not accepted; unknown keys are ignored.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub logo_url: Option<String>,
    pub download_url: Option<String>,
    pub screenshots: Option<Vec<String>>,
}

impl TryFrom<UpdateAppRequest> for AppUpdate {
    type Error = AppValidationError;

    fn try_from(value: UpdateAppRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.as_deref().map(AppName::new).transpose()?,
            description: value
                .description
                .as_deref()
                .map(AppDescription::new)
                .transpose()?,
            category: value
                .category
                .as_deref()
                .map(str::parse::<AppCategory>)
                .transpose()?,
            logo_url: value
                .logo_url
                .as_deref()
                .map(|url| AssetUrl::new(url, UrlField::Logo))
                .transpose()?,
            download_url: value
                .download_url
                .as_deref()
                .map(|url| AssetUrl::new(url, UrlField::Download))
                .transpose()?,
            screenshots: value
                .screenshots
                .as_deref()
                .map(Screenshots::new)
                .transpose()?,
        })
    }
}

/// Published apps, newest first.
#[utoipa::path(
    get,
    path = "/api/apps",
    responses(
        (status = 200, description = "Published apps", body = [AppResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "listPublishedApps",
    security([])
)]
#[get("/apps")]
pub async fn list_published_apps(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AppResponse>>> {
    let apps = state.catalogue.list_published().await?;
    Ok(web::Json(app_list(apps)))
}

/// Any app by id, whatever its moderation status.
#[utoipa::path(
    get,
    path = "/api/apps/{id}",
    params(("id" = String, Path, description = "App id")),
    responses(
        (status = 200, description = "App", body = AppResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "App not found", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "getApp",
    security([])
)]
#[get("/apps/{id}")]
pub async fn get_app(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppResponse>> {
    let app_id = parse_app_id(&path, "id")?;
    let app = state.catalogue.get_app(&app_id).await?;
    Ok(web::Json(app.into()))
}

/// Record a download. Always acknowledges; failures are only logged.
#[utoipa::path(
    post,
    path = "/api/apps/{id}/download",
    params(("id" = String, Path, description = "App id")),
    responses((status = 200, description = "Download recorded", body = MessageResponse)),
    tags = ["apps"],
    operation_id = "recordDownload",
    security([])
)]
#[post("/apps/{id}/download")]
pub async fn record_download(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> web::Json<MessageResponse> {
    let outcome = match parse_app_id(&path, "id") {
        Ok(app_id) => state.submissions.increment_downloads(&app_id).await,
        Err(error) => Err(error),
    };
    if let Err(error) = outcome {
        warn!(
            app_id = %path.as_str(),
            code = ?error.code(),
            message = error.message(),
            "download not recorded"
        );
    }
    web::Json(MessageResponse::new("Download recorded"))
}

/// Apps owned by the signed-in developer, newest first.
#[utoipa::path(
    get,
    path = "/api/developer/apps",
    responses(
        (status = 200, description = "Developer's apps", body = [AppResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "listDeveloperApps"
)]
#[get("/developer/apps")]
pub async fn list_developer_apps(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AppResponse>>> {
    let developer_id = session.require_developer_id()?;
    let apps = state.catalogue.list_by_developer(&developer_id).await?;
    Ok(web::Json(app_list(apps)))
}

/// Submit a new app for review.
#[utoipa::path(
    post,
    path = "/api/apps",
    request_body = CreateAppRequest,
    responses(
        (status = 201, description = "App submitted", body = AppResponse),
        (status = 400, description = "Invalid app data", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "createApp"
)]
#[post("/apps")]
pub async fn create_app(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAppRequest>,
) -> ApiResult<HttpResponse> {
    let developer_id = session.require_developer_id()?;
    let submission =
        AppSubmission::try_from(payload.into_inner()).map_err(|err| app_validation_error(&err))?;
    let app = state
        .submissions
        .create_app(&developer_id, submission)
        .await?;
    Ok(HttpResponse::Created().json(AppResponse::from(app)))
}

/// Edit an owned app's descriptive metadata.
#[utoipa::path(
    put,
    path = "/api/apps/{id}",
    params(("id" = String, Path, description = "App id")),
    request_body = UpdateAppRequest,
    responses(
        (status = 200, description = "Updated app", body = AppResponse),
        (status = 400, description = "Invalid app data", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "App not found", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "updateApp"
)]
#[put("/apps/{id}")]
pub async fn update_app(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateAppRequest>,
) -> ApiResult<web::Json<AppResponse>> {
    let developer_id = session.require_developer_id()?;
    let app_id = parse_app_id(&path, "id")?;
    state.submissions.editable_app(&developer_id, &app_id).await?;
    let update =
        AppUpdate::try_from(payload.into_inner()).map_err(|err| app_validation_error(&err))?;
    let app = state
        .submissions
        .update_app(&developer_id, &app_id, update)
        .await?;
    Ok(web::Json(app.into()))
}

#[cfg(test)]
#[path = "apps_tests.rs"]
mod tests;
