//! Listing-fee payment handlers.
//!
//! ```text
//! POST /api/payments/initialize {"appId":"3fa85f64-..."}
//! POST /api/payments/verify {"reference":"app_3fa85f64-..._Xy12..."}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, PaymentInitializationResponse, PaymentVerificationResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_app_id, parse_reference};

/// Body for `POST /api/payments/initialize`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitializePaymentRequest {
    pub app_id: Option<String>,
}

/// Body for `POST /api/payments/verify`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    /// Provider reference returned by initialisation.
    pub reference: Option<String>,
}

/// Start a hosted checkout for an owned app's listing fee.
#[utoipa::path(
    post,
    path = "/api/payments/initialize",
    request_body = InitializePaymentRequest,
    responses(
        (status = 200, description = "Checkout created", body = PaymentInitializationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "App not found", body = ErrorSchema),
        (status = 409, description = "Fee already paid or retries disabled", body = ErrorSchema),
        (status = 502, description = "Payment provider failed", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "initializePayment"
)]
#[post("/payments/initialize")]
pub async fn initialize_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<InitializePaymentRequest>,
) -> ApiResult<web::Json<PaymentInitializationResponse>> {
    let developer_id = session.require_developer_id()?;
    let raw = payload
        .into_inner()
        .app_id
        .ok_or_else(|| missing_field_error("appId"))?;
    let app_id = parse_app_id(&raw, "appId")?;
    let init = state
        .submissions
        .initialize_payment(&developer_id, &app_id)
        .await?;
    Ok(web::Json(init.into()))
}

/// Confirm a checkout with the provider and settle the attempt.
///
/// Unauthenticated so the provider's redirect target can call it directly.
#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Attempt settled", body = PaymentVerificationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Payment not found", body = ErrorSchema),
        (status = 502, description = "Payment provider failed", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "verifyPayment",
    security([])
)]
#[post("/payments/verify")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<web::Json<PaymentVerificationResponse>> {
    let raw = payload.into_inner().reference.unwrap_or_default();
    let reference = parse_reference(&raw)?;
    let verification = state.submissions.verify_payment(&reference).await?;
    Ok(web::Json(verification.into()))
}
