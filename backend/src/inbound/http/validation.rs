//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `invalid_request` with a
//! `{ "field", "code" }` details object so clients can highlight the input.

use serde_json::json;

use crate::domain::{
    AppId, AppStatus, AppValidationError, CredentialsValidationError, Error, PaymentReference,
};

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code,
        }))
    }
}

pub(crate) fn app_validation_error(err: &AppValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn credentials_validation_error(err: &CredentialsValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code("missing_field")
}

/// Parse an app id taken from a path segment or body field.
pub(crate) fn parse_app_id(raw: &str, field: &'static str) -> Result<AppId, Error> {
    AppId::parse(raw).map_err(|err| {
        ValidationError::new(field, format!("{field} must be a valid UUID"))
            .with_value(err.code(), raw)
    })
}

pub(crate) fn parse_app_status(raw: &str) -> Result<AppStatus, Error> {
    raw.parse::<AppStatus>()
        .map_err(|err| app_validation_error(&err))
}

pub(crate) fn parse_reference(raw: &str) -> Result<PaymentReference, Error> {
    PaymentReference::parse(raw).ok_or_else(|| missing_field_error("reference"))
}
