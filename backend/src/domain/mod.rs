//! Domain primitives, aggregates and services.
//!
//! Purpose: define the marketplace's strongly typed entities (developers,
//! apps, listing-fee payments) and the services that drive their lifecycle.
//! Types validate on construction so adapters only ever see well-formed
//! values. Transport concerns stay in `inbound`, storage in `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Developer, App, Payment: aggregates.
//! - DeveloperAccountService, SubmissionLifecycleService,
//!   CatalogueQueryService: driving port implementations.

pub mod admin;
pub mod app;
pub mod auth;
mod catalogue_service;
pub mod credentials;
mod developer_account_service;
pub mod developer;
pub mod error;
pub mod payment;
pub mod ports;
mod repository_errors;
mod submission_service;
pub mod trace_id;

pub use self::admin::{ADMIN_TOKEN_MIN, AdminToken, AdminTokenError, TokenAdminAuthenticator};
pub use self::app::{
    App, AppCategory, AppDescription, AppId, AppName, AppStatus, AppSubmission, AppUpdate,
    AppValidationError, AssetUrl, PaymentStatus, Rating, SCREENSHOT_COUNT, Screenshots, UrlField,
};
pub use self::auth::{CredentialsValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::catalogue_service::CatalogueQueryService;
pub use self::developer::{
    Developer, DeveloperId, DeveloperName, DeveloperValidationError, EmailAddress, PasswordDigest,
};
pub use self::developer_account_service::DeveloperAccountService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::payment::{
    LISTING_CURRENCY, LISTING_FEE, Payment, PaymentId, PaymentReference, PaymentRetryPolicy,
    PaymentSettlement, RetryDecision, RetryRefusal, UnknownRetryPolicy, to_minor_units,
};
pub use self::submission_service::{PaymentFlowSettings, SubmissionLifecycleService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use medstore::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
