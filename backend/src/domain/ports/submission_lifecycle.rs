//! Driving port for the app submission lifecycle.
//!
//! Covers creation and editing by the owning developer, the listing-fee
//! payment flow, administrative moderation, and download counting.

use async_trait::async_trait;

use crate::domain::{
    App, AppId, AppStatus, AppSubmission, AppUpdate, DeveloperId, Error, Payment, PaymentId,
    PaymentReference, PaymentStatus,
};

/// Result of starting a listing-fee checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitialization {
    pub payment_id: PaymentId,
    pub authorization_url: String,
    /// Provider reference the client must present on verification.
    pub reference: PaymentReference,
}

/// Result of verifying a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    pub status: PaymentStatus,
    pub message: String,
    pub payment: Payment,
}

impl PaymentVerification {
    pub fn from_payment(payment: Payment) -> Self {
        let message = match payment.status {
            PaymentStatus::Completed => "Payment verified successfully",
            PaymentStatus::Failed => "Payment verification failed",
            PaymentStatus::Pending => "Payment has not been completed yet",
        };
        Self {
            status: payment.status,
            message: message.to_owned(),
            payment,
        }
    }
}

/// Submission and moderation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionLifecycle: Send + Sync {
    /// Submit a new app on behalf of `developer_id`.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` when the developer no longer exists.
    async fn create_app(
        &self,
        developer_id: &DeveloperId,
        submission: AppSubmission,
    ) -> Result<App, Error>;

    /// The app `developer_id` may edit.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for unknown apps and `forbidden` when the requester
    /// does not own the app.
    async fn editable_app(&self, developer_id: &DeveloperId, app_id: &AppId) -> Result<App, Error>;

    /// Apply an owner edit.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for unknown apps and `forbidden` when the requester
    /// does not own the app.
    async fn update_app(
        &self,
        developer_id: &DeveloperId,
        app_id: &AppId,
        update: AppUpdate,
    ) -> Result<App, Error>;

    /// Start a listing-fee checkout for an owned app.
    ///
    /// # Errors
    ///
    /// Returns `conflict` when the retry policy refuses a new attempt and
    /// `upstream_unavailable` when the provider cannot be reached. Nothing is
    /// recorded in either case.
    async fn initialize_payment(
        &self,
        developer_id: &DeveloperId,
        app_id: &AppId,
    ) -> Result<PaymentInitialization, Error>;

    /// Confirm a checkout with the provider and settle it.
    ///
    /// Completed payments are returned unchanged without contacting the
    /// provider. Checkouts the provider still reports as open stay pending,
    /// and a failed payment moves to completed once the provider confirms it.
    async fn verify_payment(&self, reference: &PaymentReference)
    -> Result<PaymentVerification, Error>;

    /// Moderate an app.
    async fn set_status(&self, app_id: &AppId, status: AppStatus) -> Result<App, Error>;

    /// Count one download.
    async fn increment_downloads(&self, app_id: &AppId) -> Result<(), Error>;

    /// Repair an app's payment status from its recorded attempts.
    async fn reconcile_payment(&self, app_id: &AppId) -> Result<App, Error>;
}
