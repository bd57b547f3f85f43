//! Administrative moderation handlers.
//!
//! Every route requires `Authorization: Bearer <ADMIN_TOKEN>`.
//!
//! ```text
//! GET  /api/admin/apps
//! PUT  /api/admin/apps/{id}/status {"status":"published"}
//! POST /api/admin/apps/{id}/reconcile-payment
//! ```

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, get, post, put, web};
use futures_util::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AppResponse, ErrorSchema, app_list};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_app_id, parse_app_status};

/// Proof that the request carried the administrator token.
#[derive(Debug, Clone, Copy)]
pub struct AdminContext(());

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

fn authorize(req: &HttpRequest) -> Result<AdminContext, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    state.admin.authorize(bearer_token(req)).map_err(|err| {
        warn!(path = req.path(), code = ?err.code(), "administrator check failed");
        err
    })?;
    Ok(AdminContext(()))
}

impl FromRequest for AdminContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req).map_err(actix_web::Error::from))
    }
}

/// Body for `PUT /api/admin/apps/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusUpdateRequest {
    /// One of `pending`, `published` or `rejected`.
    #[schema(example = "published")]
    pub status: Option<String>,
}

/// Every app, newest first, whatever its status.
#[utoipa::path(
    get,
    path = "/api/admin/apps",
    responses(
        (status = 200, description = "All apps", body = [AppResponse]),
        (status = 401, description = "Missing or wrong token", body = ErrorSchema),
        (status = 403, description = "Administration disabled", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listAllApps",
    security(("AdminToken" = []))
)]
#[get("/admin/apps")]
pub async fn list_all_apps(
    _admin: AdminContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AppResponse>>> {
    let apps = state.catalogue.list_all().await?;
    Ok(web::Json(app_list(apps)))
}

#[utoipa::path(
    put,
    path = "/api/admin/apps/{id}/status",
    params(("id" = String, Path, description = "App id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated app", body = AppResponse),
        (status = 400, description = "Invalid status or id", body = ErrorSchema),
        (status = 401, description = "Missing or wrong token", body = ErrorSchema),
        (status = 404, description = "App not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "setAppStatus",
    security(("AdminToken" = []))
)]
#[put("/admin/apps/{id}/status")]
pub async fn set_app_status(
    _admin: AdminContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<AppResponse>> {
    let app_id = parse_app_id(&path, "id")?;
    let raw = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error("status"))?;
    let status = parse_app_status(&raw)?;
    let app = state.submissions.set_status(&app_id, status).await?;
    Ok(web::Json(app.into()))
}

/// Recompute an app's payment status from its recorded attempts.
#[utoipa::path(
    post,
    path = "/api/admin/apps/{id}/reconcile-payment",
    params(("id" = String, Path, description = "App id")),
    responses(
        (status = 200, description = "Reconciled app", body = AppResponse),
        (status = 401, description = "Missing or wrong token", body = ErrorSchema),
        (status = 404, description = "App not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "reconcilePayment",
    security(("AdminToken" = []))
)]
#[post("/admin/apps/{id}/reconcile-payment")]
pub async fn reconcile_payment(
    _admin: AdminContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppResponse>> {
    let app_id = parse_app_id(&path, "id")?;
    let app = state.submissions.reconcile_payment(&app_id).await?;
    Ok(web::Json(app.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        ADMIN_TOKEN, paying_state, sign_in, submit_app, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    fn bearer_tokens_are_extracted(#[case] header: &str, #[case] expected: Option<&str>) {
        let req = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        assert_eq!(bearer_token(&req), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer wrong-token"))]
    #[actix_web::test]
    async fn admin_routes_require_the_token(#[case] header: Option<&str>) {
        let app = actix_test::init_service(test_app(paying_state())).await;
        let mut req = actix_test::TestRequest::get().uri("/api/admin/apps");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn moderation_controls_catalogue_visibility() {
        let app = actix_test::init_service(test_app(paying_state())).await;
        let cookie = sign_in(&app, "d@x.com").await;
        let published = submit_app(&app, cookie.clone(), "Foo").await;
        let rejected = submit_app(&app, cookie, "Bar").await;
        let bearer = format!("Bearer {ADMIN_TOKEN}");

        for (id, status) in [(&published, "published"), (&rejected, "rejected")] {
            let body: Value = actix_test::call_and_read_body_json(
                &app,
                actix_test::TestRequest::put()
                    .uri(&format!("/api/admin/apps/{id}/status"))
                    .insert_header((AUTHORIZATION, bearer.as_str()))
                    .set_json(json!({ "status": status }))
                    .to_request(),
            )
            .await;
            assert_eq!(body["status"], status);
        }

        let catalogue: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri("/api/apps").to_request(),
        )
        .await;
        let visible: Vec<&str> = catalogue
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|app| app["id"].as_str())
            .collect();
        assert_eq!(visible, vec![published.as_str()]);

        let everything: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/admin/apps")
                .insert_header((AUTHORIZATION, bearer.as_str()))
                .to_request(),
        )
        .await;
        assert_eq!(everything.as_array().map(Vec::len), Some(2));
    }

    #[rstest]
    #[case(json!({ "status": "archived" }))]
    #[case(json!({}))]
    #[actix_web::test]
    async fn unknown_statuses_are_rejected(#[case] body: Value) {
        let app = actix_test::init_service(test_app(paying_state())).await;
        let cookie = sign_in(&app, "d@x.com").await;
        let id = submit_app(&app, cookie, "Foo").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/admin/apps/{id}/status"))
                .insert_header((AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}")))
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn reconciliation_of_missing_apps_is_not_found() {
        let app = actix_test::init_service(test_app(paying_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/admin/apps/3fa85f64-5717-4562-b3fc-2c963f66afa6/reconcile-payment")
                .insert_header((AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
