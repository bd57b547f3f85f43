//! Wire shapes for the Paystack transaction endpoints.
//!
//! Every Paystack response is wrapped in `{ status, message, data }`; `data`
//! is absent or `null` when `status` is false.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct InitializeRequestDto<'a> {
    pub(super) email: &'a str,
    /// Minor units.
    pub(super) amount: u64,
    pub(super) reference: &'a str,
    pub(super) currency: &'a str,
    pub(super) callback_url: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeDto<T> {
    pub(super) status: bool,
    #[serde(default)]
    pub(super) message: String,
    pub(super) data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct InitializeDataDto {
    pub(super) authorization_url: String,
    pub(super) reference: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyDataDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) amount: u64,
    #[serde(default)]
    pub(super) currency: String,
    #[serde(default)]
    pub(super) paid_at: Option<DateTime<Utc>>,
}

impl<T> EnvelopeDto<T> {
    /// Unwrap `data` from an accepted envelope.
    ///
    /// `Err` carries the provider's message when the request was refused.
    pub(super) fn into_accepted(self) -> Result<T, String> {
        match (self.status, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response accepted without data".to_owned()),
            (false, _) if self.message.is_empty() => Err("request refused".to_owned()),
            (false, _) => Err(self.message),
        }
    }
}
