//! Reqwest-backed Paystack gateway.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout and HTTP error mapping, and decoding Paystack
//! envelopes into gateway verdicts. It never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{EnvelopeDto, InitializeDataDto, InitializeRequestDto, VerifyDataDto};
use crate::domain::ports::{
    ChargeOutcome, Checkout, CheckoutRequest, GatewayVerification, PaymentGateway,
    PaymentGatewayError,
};
use crate::domain::{LISTING_CURRENCY, PaymentReference, to_minor_units};

const DEFAULT_BASE_URL: &str = "https://api.paystack.co";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Classify a Paystack transaction status; anything not yet final is `Open`.
fn charge_outcome(status: &str) -> ChargeOutcome {
    match status {
        "success" => ChargeOutcome::Succeeded,
        "failed" | "reversed" | "reversal_pending" => ChargeOutcome::Declined,
        // abandoned, ongoing, pending, processing, queued
        _ => ChargeOutcome::Open,
    }
}

/// Connection settings for the Paystack API.
///
/// Not `Debug`: it carries the secret key.
#[derive(Clone)]
pub struct PaystackConfig {
    pub base_url: Url,
    pub secret_key: Zeroizing<String>,
    pub timeout: Duration,
}

impl PaystackConfig {
    /// Settings for the public API with the default timeout.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in base URL cannot be parsed.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            secret_key: Zeroizing::new(secret_key.into()),
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// Payment gateway that talks to Paystack over HTTPS.
pub struct PaystackGateway {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

impl PaystackGateway {
    /// Build a gateway using a reqwest client with an explicit timeout.
    ///
    /// ```rust,ignore
    /// let gateway = PaystackGateway::new(PaystackConfig::new(secret)?)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: PaystackConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            secret_key: config.secret_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PaymentGatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentGatewayError::transport("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PaymentGatewayError> {
        let response = request
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_envelope(body.as_ref())
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<Checkout, PaymentGatewayError> {
        let url = self.endpoint(&["transaction", "initialize"])?;
        let payload = InitializeRequestDto {
            email: request.email.as_ref(),
            amount: to_minor_units(request.amount),
            reference: request.reference.as_ref(),
            currency: LISTING_CURRENCY,
            callback_url: &request.callback_url,
        };
        debug!(reference = %request.reference, "initialising Paystack transaction");
        let data: InitializeDataDto = self.send(self.client.post(url).json(&payload)).await?;
        into_checkout(data)
    }

    async fn verify(
        &self,
        reference: &PaymentReference,
    ) -> Result<GatewayVerification, PaymentGatewayError> {
        let url = self.endpoint(&["transaction", "verify", reference.as_ref()])?;
        debug!(%reference, "verifying Paystack transaction");
        let data: VerifyDataDto = self.send(self.client.get(url)).await?;
        Ok(into_verification(data))
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, PaymentGatewayError> {
    let envelope: EnvelopeDto<T> = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid Paystack JSON payload: {error}"))
    })?;
    envelope
        .into_accepted()
        .map_err(PaymentGatewayError::rejected)
}

fn into_checkout(data: InitializeDataDto) -> Result<Checkout, PaymentGatewayError> {
    let provider_reference = PaymentReference::parse(&data.reference)
        .ok_or_else(|| PaymentGatewayError::decode("blank transaction reference"))?;
    if data.authorization_url.trim().is_empty() {
        return Err(PaymentGatewayError::decode("blank authorization URL"));
    }
    Ok(Checkout {
        authorization_url: data.authorization_url,
        provider_reference,
    })
}

fn into_verification(data: VerifyDataDto) -> GatewayVerification {
    GatewayVerification {
        outcome: charge_outcome(&data.status),
        provider_status: data.status,
        amount_minor: data.amount,
        currency: data.currency,
        paid_at: data.paid_at,
    }
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ => PaymentGatewayError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
