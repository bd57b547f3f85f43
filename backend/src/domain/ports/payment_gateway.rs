//! Port abstraction for the listing-fee payment provider.
//!
//! Adapters initialise hosted checkouts and confirm their outcome. The
//! provider is authoritative; callers never infer success from redirects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, PaymentReference};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// Network or TLS failure talking to the provider.
        Transport { message: String } => "payment gateway transport failed: {message}",
        /// Provider did not answer before the client timeout.
        Timeout { message: String } => "payment gateway timed out: {message}",
        /// Provider answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "payment gateway returned status {status}: {message}",
        /// Provider answered `status: false`.
        Rejected { message: String } => "payment gateway rejected the request: {message}",
        /// Provider payload could not be decoded.
        Decode { message: String } => "payment gateway response was invalid: {message}",
    }
}

/// Checkout initialisation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub email: EmailAddress,
    /// Amount in major currency units.
    pub amount: u32,
    pub reference: PaymentReference,
    pub callback_url: String,
}

/// Hosted checkout returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub authorization_url: String,
    /// Reference the provider will recognise on verification.
    pub provider_reference: PaymentReference,
}

/// Where the provider says a charge stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// Money was received.
    Succeeded,
    /// The charge failed or was reversed.
    Declined,
    /// The checkout is still open; the developer may yet pay on it.
    Open,
}

/// Provider verdict for a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayVerification {
    pub outcome: ChargeOutcome,
    pub provider_status: String,
    /// Amount charged in minor units.
    pub amount_minor: u64,
    /// ISO 4217 code reported by the provider.
    pub currency: String,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Outbound port for the payment provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a hosted checkout.
    async fn initialize(&self, request: &CheckoutRequest) -> Result<Checkout, PaymentGatewayError>;

    /// Ask the provider for the outcome of `reference`.
    async fn verify(
        &self,
        reference: &PaymentReference,
    ) -> Result<GatewayVerification, PaymentGatewayError>;
}

/// Deterministic in-process gateway.
///
/// Checkouts point at a local URL and echo the internal reference.
/// Verification succeeds for the full listing fee unless built with
/// [`FixturePaymentGateway::declining`].
#[derive(Debug, Clone, Copy)]
pub struct FixturePaymentGateway {
    succeed: bool,
}

impl FixturePaymentGateway {
    pub const fn succeeding() -> Self {
        Self { succeed: true }
    }

    pub const fn declining() -> Self {
        Self { succeed: false }
    }
}

impl Default for FixturePaymentGateway {
    fn default() -> Self {
        Self::succeeding()
    }
}

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<Checkout, PaymentGatewayError> {
        Ok(Checkout {
            authorization_url: format!("https://checkout.invalid/pay/{}", request.reference),
            provider_reference: request.reference.clone(),
        })
    }

    async fn verify(
        &self,
        _reference: &PaymentReference,
    ) -> Result<GatewayVerification, PaymentGatewayError> {
        let verification = if self.succeed {
            GatewayVerification {
                outcome: ChargeOutcome::Succeeded,
                provider_status: "success".to_owned(),
                amount_minor: crate::domain::to_minor_units(crate::domain::LISTING_FEE),
                currency: crate::domain::LISTING_CURRENCY.to_owned(),
                paid_at: Some(Utc::now()),
            }
        } else {
            GatewayVerification {
                outcome: ChargeOutcome::Declined,
                provider_status: "failed".to_owned(),
                amount_minor: 0,
                currency: crate::domain::LISTING_CURRENCY.to_owned(),
                paid_at: None,
            }
        };
        Ok(verification)
    }
}
