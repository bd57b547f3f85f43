//! Response bodies and OpenAPI schema definitions.
//!
//! Domain types stay framework-agnostic and never derive `Serialize` or
//! `ToSchema`. Handlers convert them into the camelCase DTOs below; the
//! error wrappers register schemas for the domain error payload via utoipa's
//! external schema support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{PaymentInitialization, PaymentVerification};
use crate::domain::{App, Developer, Payment};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the resource's current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The payment provider failed or could not be reached.
    #[schema(rename = "upstream_unavailable")]
    UpstreamUnavailable,
    /// A backing store is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "exactly 4 screenshots are required, got 3")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Validation context such as `{ "field": "screenshots", "code": "invalid_screenshot_count" }`.
    details: Option<serde_json::Value>,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public view of a developer account. Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperResponse {
    pub id: Uuid,
    #[schema(example = "developer@med-a.com")]
    pub email: String,
    #[schema(example = "MED-A Team")]
    pub name: String,
    #[schema(example = "Medical Education Solutions")]
    pub company: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Developer> for DeveloperResponse {
    fn from(developer: Developer) -> Self {
        Self {
            id: *developer.id.as_uuid(),
            email: developer.email.as_ref().to_owned(),
            name: developer.name.as_ref().to_owned(),
            company: developer.company,
            is_verified: developer.is_verified,
            created_at: developer.created_at,
        }
    }
}

/// Marketplace app as shown in the catalogue and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse {
    pub id: Uuid,
    #[schema(example = "MED-A")]
    pub name: String,
    pub description: String,
    #[schema(example = "Medical Education")]
    pub category: String,
    pub logo_url: String,
    pub download_url: String,
    /// Exactly four screenshot URLs.
    pub screenshots: Vec<String>,
    pub developer_id: Uuid,
    pub developer_name: String,
    #[schema(example = "published")]
    pub status: String,
    #[schema(example = "completed")]
    pub payment_status: String,
    pub payment_id: Option<Uuid>,
    #[schema(example = 4.8)]
    pub rating: f64,
    #[schema(example = 1250)]
    pub downloads: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<App> for AppResponse {
    fn from(app: App) -> Self {
        Self {
            id: *app.id.as_uuid(),
            name: app.name.as_ref().to_owned(),
            description: app.description.as_ref().to_owned(),
            category: app.category.as_str().to_owned(),
            logo_url: app.logo_url.as_ref().to_owned(),
            download_url: app.download_url.as_ref().to_owned(),
            screenshots: app.screenshots.to_strings(),
            developer_id: *app.developer_id.as_uuid(),
            developer_name: app.developer_name,
            status: app.status.as_str().to_owned(),
            payment_status: app.payment_status.as_str().to_owned(),
            payment_id: app.payment_id.map(|id| *id.as_uuid()),
            rating: app.rating.value(),
            downloads: app.downloads,
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }
}

pub(crate) fn app_list(apps: Vec<App>) -> Vec<AppResponse> {
    apps.into_iter().map(AppResponse::from).collect()
}

/// One listing-fee attempt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    pub app_id: Uuid,
    pub developer_id: Uuid,
    /// Major currency units.
    #[schema(example = 1000)]
    pub amount: u32,
    #[schema(example = "KES")]
    pub currency: String,
    pub reference: String,
    pub paystack_reference: String,
    #[schema(example = "completed")]
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            app_id: *payment.app_id.as_uuid(),
            developer_id: *payment.developer_id.as_uuid(),
            amount: payment.amount,
            currency: payment.currency,
            reference: payment.reference.to_string(),
            paystack_reference: payment.provider_reference.to_string(),
            status: payment.status.as_str().to_owned(),
            paid_at: payment.paid_at,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

/// Hosted checkout handed back to the developer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitializationResponse {
    pub payment_id: Uuid,
    pub authorization_url: String,
    /// Provider reference to pass to `POST /api/payments/verify`.
    pub reference: String,
}

impl From<PaymentInitialization> for PaymentInitializationResponse {
    fn from(init: PaymentInitialization) -> Self {
        Self {
            payment_id: *init.payment_id.as_uuid(),
            authorization_url: init.authorization_url,
            reference: init.reference.to_string(),
        }
    }
}

/// Outcome of a verification request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerificationResponse {
    #[schema(example = "completed")]
    pub status: String,
    #[schema(example = "Payment verified successfully")]
    pub message: String,
    pub payment: PaymentResponse,
}

impl From<PaymentVerification> for PaymentVerificationResponse {
    fn from(verification: PaymentVerification) -> Self {
        Self {
            status: verification.status.as_str().to_owned(),
            message: verification.message,
            payment: verification.payment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_app, sample_developer};
    use serde_json::Value;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "upstream_unavailable",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn developer_json_is_camel_case_without_secrets() {
        let body = DeveloperResponse::from(sample_developer());
        let value = serde_json::to_value(body).expect("serialise");
        assert!(value.get("isVerified").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_digest").is_none());
    }

    #[test]
    fn app_json_uses_wire_labels() {
        let app = sample_app(&sample_developer());
        let value = serde_json::to_value(AppResponse::from(app)).expect("serialise");
        assert_eq!(value["category"], "Pharmacy");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["paymentStatus"], "pending");
        assert_eq!(value["downloads"], 0);
        assert_eq!(
            value["screenshots"].as_array().map(Vec::len),
            Some(4)
        );
        assert_eq!(value["paymentId"], Value::Null);
    }
}
