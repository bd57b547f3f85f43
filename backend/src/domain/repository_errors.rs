//! Translation of port errors into domain errors shared by the services.

use tracing::warn;

use super::Error;
use super::ports::{
    AppRepositoryError, DeveloperRepositoryError, PaymentGatewayError, PaymentRepositoryError,
};

pub(crate) fn map_developer_error(error: DeveloperRepositoryError) -> Error {
    match error {
        DeveloperRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("developer repository unavailable: {message}"))
        }
        DeveloperRepositoryError::Query { message } => {
            Error::internal(format!("developer repository error: {message}"))
        }
        DeveloperRepositoryError::DuplicateEmail { .. } => {
            Error::conflict("Developer already exists with this email")
        }
    }
}

pub(crate) fn map_app_error(error: AppRepositoryError) -> Error {
    match error {
        AppRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("app repository unavailable: {message}"))
        }
        AppRepositoryError::Query { message } => {
            Error::internal(format!("app repository error: {message}"))
        }
    }
}

pub(crate) fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
        PaymentRepositoryError::DuplicateReference { reference } => {
            Error::internal(format!("payment reference collision: {reference}"))
        }
        PaymentRepositoryError::Missing { message } => Error::not_found(message),
    }
}

/// Provider failures surface as `502` with a generic message; the detail is
/// only logged.
pub(crate) fn map_gateway_error(error: PaymentGatewayError) -> Error {
    warn!(error = %error, "payment gateway call failed");
    let reason = match error {
        PaymentGatewayError::Transport { .. } => "transport",
        PaymentGatewayError::Timeout { .. } => "timeout",
        PaymentGatewayError::Status { .. } => "status",
        PaymentGatewayError::Rejected { .. } => "rejected",
        PaymentGatewayError::Decode { .. } => "decode",
    };
    Error::upstream_unavailable("Payment provider unavailable")
        .with_details(serde_json::json!({ "reason": reason }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(DeveloperRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(DeveloperRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[case(DeveloperRepositoryError::duplicate_email("a@b.co"), ErrorCode::Conflict)]
    fn developer_errors_map_to_codes(
        #[case] error: DeveloperRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_developer_error(error).code(), expected);
    }

    #[rstest]
    #[case(PaymentGatewayError::timeout("30s"), "timeout")]
    #[case(PaymentGatewayError::status(500_u16, "oops"), "status")]
    #[case(PaymentGatewayError::rejected("Invalid key"), "rejected")]
    fn gateway_errors_are_upstream(#[case] error: PaymentGatewayError, #[case] reason: &str) {
        let mapped = map_gateway_error(error);
        assert_eq!(mapped.code(), ErrorCode::UpstreamUnavailable);
        assert_eq!(
            mapped.details().and_then(|d| d.get("reason")).and_then(|r| r.as_str()),
            Some(reason)
        );
    }

    #[rstest]
    fn missing_payment_records_are_not_found() {
        let mapped = map_payment_error(PaymentRepositoryError::missing("app gone"));
        assert_eq!(mapped.code(), ErrorCode::NotFound);
    }
}
