//! App submission lifecycle service.
//!
//! Owns the two state machines on an app: moderation status, driven by the
//! administrator, and payment status, driven by the listing-fee flow. The
//! payment provider is consulted on every verification until the fee is
//! confirmed, and a final verdict is written to the payment and the app in
//! one repository call.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::ports::{
    AppRepository, ChargeOutcome, CheckoutRequest, DeveloperRepository, GatewayVerification,
    PaymentGateway, PaymentInitialization, PaymentRepository, PaymentVerification,
    SubmissionLifecycle,
};
use super::repository_errors::{
    map_app_error, map_developer_error, map_gateway_error, map_payment_error,
};
use super::{
    App, AppId, AppStatus, AppSubmission, AppUpdate, Developer, DeveloperId, Error,
    LISTING_CURRENCY, LISTING_FEE, Payment, PaymentReference, PaymentRetryPolicy,
    PaymentSettlement, PaymentStatus, RetryDecision, RetryRefusal, to_minor_units,
};

const APP_NOT_FOUND: &str = "App not found";
const NOT_EDITABLE: &str = "Not authorized to update this app";

/// Settings for the listing-fee flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFlowSettings {
    pub retry_policy: PaymentRetryPolicy,
    /// Where the provider redirects the developer after checkout.
    pub callback_url: String,
}

impl Default for PaymentFlowSettings {
    fn default() -> Self {
        Self {
            retry_policy: PaymentRetryPolicy::default(),
            callback_url: "http://localhost:5000/payment/callback".to_owned(),
        }
    }
}

/// Service implementing [`SubmissionLifecycle`].
#[derive(Clone)]
pub struct SubmissionLifecycleService<D, A, P> {
    developers: Arc<D>,
    apps: Arc<A>,
    payments: Arc<P>,
    gateway: Arc<dyn PaymentGateway>,
    settings: PaymentFlowSettings,
    clock: Arc<dyn Clock>,
}

impl<D, A, P> SubmissionLifecycleService<D, A, P> {
    pub fn new(
        developers: Arc<D>,
        apps: Arc<A>,
        payments: Arc<P>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            developers,
            apps,
            payments,
            gateway,
            settings: PaymentFlowSettings::default(),
            clock,
        }
    }

    pub fn with_settings(mut self, settings: PaymentFlowSettings) -> Self {
        self.settings = settings;
        self
    }
}

fn retry_refused(refusal: RetryRefusal) -> Error {
    let code = match refusal {
        RetryRefusal::AlreadyPaid => "already_paid",
        RetryRefusal::RetriesDisabled => "retries_disabled",
    };
    Error::conflict(refusal.to_string()).with_details(json!({ "code": code }))
}

/// Payment status implied by the provider's verdict; `None` while the
/// checkout is still open.
///
/// A charge only counts when the full fee arrived in the listing currency.
fn verdict_status(verdict: &GatewayVerification, fee: u32) -> Option<PaymentStatus> {
    match verdict.outcome {
        ChargeOutcome::Open => None,
        ChargeOutcome::Succeeded
            if verdict.amount_minor >= to_minor_units(fee)
                && verdict.currency.eq_ignore_ascii_case(LISTING_CURRENCY) =>
        {
            Some(PaymentStatus::Completed)
        }
        ChargeOutcome::Succeeded | ChargeOutcome::Declined => Some(PaymentStatus::Failed),
    }
}

/// Status the app should carry given its recorded attempts, newest first.
fn reconciled_status(current: PaymentStatus, attempts: &[Payment]) -> Option<PaymentStatus> {
    let any_completed = attempts
        .iter()
        .any(|payment| payment.status == PaymentStatus::Completed);
    if any_completed {
        return (current != PaymentStatus::Completed).then_some(PaymentStatus::Completed);
    }
    let latest_failed = attempts
        .first()
        .is_some_and(|payment| payment.status == PaymentStatus::Failed);
    (current == PaymentStatus::Pending && latest_failed).then_some(PaymentStatus::Failed)
}

impl<D, A, P> SubmissionLifecycleService<D, A, P>
where
    D: DeveloperRepository,
    A: AppRepository,
    P: PaymentRepository,
{
    async fn require_developer(&self, id: &DeveloperId) -> Result<Developer, Error> {
        self.developers
            .find_by_id(id)
            .await
            .map_err(map_developer_error)?
            .ok_or_else(|| Error::unauthorized("Developer not found"))
    }

    async fn require_app(&self, id: &AppId) -> Result<App, Error> {
        self.apps
            .find_by_id(id)
            .await
            .map_err(map_app_error)?
            .ok_or_else(|| Error::not_found(APP_NOT_FOUND))
    }

    async fn require_owned_app(
        &self,
        developer_id: &DeveloperId,
        app_id: &AppId,
        refusal: &str,
    ) -> Result<App, Error> {
        let app = self.require_app(app_id).await?;
        if !app.is_owned_by(developer_id) {
            return Err(Error::forbidden(refusal));
        }
        Ok(app)
    }
}

#[async_trait]
impl<D, A, P> SubmissionLifecycle for SubmissionLifecycleService<D, A, P>
where
    D: DeveloperRepository,
    A: AppRepository,
    P: PaymentRepository,
{
    async fn create_app(
        &self,
        developer_id: &DeveloperId,
        submission: AppSubmission,
    ) -> Result<App, Error> {
        let developer = self.require_developer(developer_id).await?;
        let app = App::submitted(AppId::random(), submission, &developer, self.clock.utc());
        self.apps.insert(&app).await.map_err(map_app_error)?;
        info!(app_id = %app.id, developer_id = %developer.id, "app submitted");
        Ok(app)
    }

    async fn editable_app(&self, developer_id: &DeveloperId, app_id: &AppId) -> Result<App, Error> {
        self.require_owned_app(developer_id, app_id, NOT_EDITABLE).await
    }

    async fn update_app(
        &self,
        developer_id: &DeveloperId,
        app_id: &AppId,
        update: AppUpdate,
    ) -> Result<App, Error> {
        let mut app = self
            .require_owned_app(developer_id, app_id, NOT_EDITABLE)
            .await?;
        if update.is_empty() {
            return Ok(app);
        }
        app.apply(update, self.clock.utc());
        let stored = self
            .apps
            .update_metadata(&app)
            .await
            .map_err(map_app_error)?
            .ok_or_else(|| Error::not_found(APP_NOT_FOUND))?;
        info!(app_id = %stored.id, "app metadata updated");
        Ok(stored)
    }

    async fn initialize_payment(
        &self,
        developer_id: &DeveloperId,
        app_id: &AppId,
    ) -> Result<PaymentInitialization, Error> {
        let app = self
            .require_owned_app(developer_id, app_id, "Not authorized")
            .await?;
        let decision = self
            .settings
            .retry_policy
            .check(app.payment_status)
            .map_err(retry_refused)?;
        let developer = self.require_developer(developer_id).await?;

        let reference = PaymentReference::generate(&app.id);
        let checkout = self
            .gateway
            .initialize(&CheckoutRequest {
                email: developer.email.clone(),
                amount: LISTING_FEE,
                reference: reference.clone(),
                callback_url: self.settings.callback_url.clone(),
            })
            .await
            .map_err(map_gateway_error)?;

        let payment = Payment::initialised(
            app.id,
            developer.id,
            reference,
            checkout.provider_reference.clone(),
            self.clock.utc(),
        );
        self.payments
            .record_attempt(&payment, decision == RetryDecision::ProceedAndReset)
            .await
            .map_err(map_payment_error)?;
        info!(
            app_id = %app.id,
            payment_id = %payment.id,
            reference = %payment.reference,
            "listing fee checkout initialised"
        );
        Ok(PaymentInitialization {
            payment_id: payment.id,
            authorization_url: checkout.authorization_url,
            reference: checkout.provider_reference,
        })
    }

    async fn verify_payment(
        &self,
        reference: &PaymentReference,
    ) -> Result<PaymentVerification, Error> {
        let payment = self
            .payments
            .find_by_provider_reference(reference)
            .await
            .map_err(map_payment_error)?
            .ok_or_else(|| Error::not_found("Payment not found"))?;
        if payment.status == PaymentStatus::Completed {
            return Ok(PaymentVerification::from_payment(payment));
        }

        let verdict = self
            .gateway
            .verify(&payment.provider_reference)
            .await
            .map_err(map_gateway_error)?;
        let Some(outcome) = verdict_status(&verdict, payment.amount) else {
            info!(
                payment_id = %payment.id,
                provider_status = %verdict.provider_status,
                "listing fee checkout still open"
            );
            return Ok(PaymentVerification::from_payment(payment));
        };
        if outcome == payment.status {
            return Ok(PaymentVerification::from_payment(payment));
        }

        let now = self.clock.utc();
        let paid = outcome == PaymentStatus::Completed;
        let settlement = PaymentSettlement {
            payment_id: payment.id,
            app_id: payment.app_id,
            outcome,
            paid_at: paid.then(|| verdict.paid_at.unwrap_or(now)),
            settled_at: now,
        };
        let settled = self
            .payments
            .settle(&settlement)
            .await
            .map_err(map_payment_error)?;
        info!(
            payment_id = %settled.id,
            app_id = %settled.app_id,
            status = %settled.status,
            provider_status = %verdict.provider_status,
            "listing fee payment settled"
        );
        Ok(PaymentVerification::from_payment(settled))
    }

    async fn set_status(&self, app_id: &AppId, status: AppStatus) -> Result<App, Error> {
        let app = self
            .apps
            .set_status(app_id, status, self.clock.utc())
            .await
            .map_err(map_app_error)?
            .ok_or_else(|| Error::not_found(APP_NOT_FOUND))?;
        info!(app_id = %app.id, status = %app.status, "app status changed");
        Ok(app)
    }

    async fn increment_downloads(&self, app_id: &AppId) -> Result<(), Error> {
        let found = self
            .apps
            .increment_downloads(app_id)
            .await
            .map_err(map_app_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(APP_NOT_FOUND))
        }
    }

    async fn reconcile_payment(&self, app_id: &AppId) -> Result<App, Error> {
        let app = self.require_app(app_id).await?;
        let attempts = self
            .payments
            .list_for_app(app_id)
            .await
            .map_err(map_payment_error)?;
        let Some(target) = reconciled_status(app.payment_status, &attempts) else {
            return Ok(app);
        };
        let repaired = self
            .apps
            .set_payment_status(app_id, target, self.clock.utc())
            .await
            .map_err(map_app_error)?
            .ok_or_else(|| Error::not_found(APP_NOT_FOUND))?;
        info!(
            app_id = %repaired.id,
            from = %app.payment_status,
            to = %repaired.payment_status,
            "app payment status reconciled"
        );
        Ok(repaired)
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;
