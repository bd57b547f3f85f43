//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_authenticator;
mod app_repository;
mod catalogue_query;
mod developer_accounts;
mod developer_repository;
mod payment_gateway;
mod payment_repository;
mod submission_lifecycle;

pub use admin_authenticator::AdminAuthenticator;
#[cfg(test)]
pub use app_repository::MockAppRepository;
pub use app_repository::{AppRepository, AppRepositoryError};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use developer_accounts::MockDeveloperAccounts;
pub use developer_accounts::DeveloperAccounts;
#[cfg(test)]
pub use developer_repository::MockDeveloperRepository;
pub use developer_repository::{DeveloperRepository, DeveloperRepositoryError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    ChargeOutcome, Checkout, CheckoutRequest, FixturePaymentGateway, GatewayVerification,
    PaymentGateway, PaymentGatewayError,
};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use submission_lifecycle::MockSubmissionLifecycle;
pub use submission_lifecycle::{PaymentInitialization, PaymentVerification, SubmissionLifecycle};
