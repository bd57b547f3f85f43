//! Port abstraction for payment attempt persistence.
//!
//! Writes that touch both a payment and its app go through one call so
//! adapters can make them atomic.

use async_trait::async_trait;

use crate::domain::{AppId, Payment, PaymentReference, PaymentSettlement};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payment repository query failed: {message}",
        /// The provider reference is already recorded.
        DuplicateReference { reference: String } =>
            "payment reference {reference} already recorded",
        /// The payment or its app disappeared.
        Missing { message: String } => "payment record missing: {message}",
    }
}

/// Storage for payment attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Record a new attempt and point the app at it.
    ///
    /// When `reset_failed_app` is set and the app's payment status is
    /// `failed`, it is moved back to `pending` in the same write.
    async fn record_attempt(
        &self,
        payment: &Payment,
        reset_failed_app: bool,
    ) -> Result<(), PaymentRepositoryError>;

    /// Fetch an attempt by the reference the provider knows it by.
    async fn find_by_provider_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// All attempts for an app, newest first.
    async fn list_for_app(&self, app_id: &AppId) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Resolve a pending attempt and mirror the outcome onto its app.
    ///
    /// Only a `pending` payment is changed; a resolved one is returned as
    /// stored. The app is never moved away from `completed`. Returns the
    /// payment as stored after the write.
    async fn settle(
        &self,
        settlement: &PaymentSettlement,
    ) -> Result<Payment, PaymentRepositoryError>;
}
