//! Listing-fee payments.
//!
//! One [`Payment`] is recorded per initialization attempt. The payment
//! provider is the source of truth for whether an attempt succeeded; the
//! record only mirrors its verdict.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use uuid::Uuid;

use super::app::{AppId, PaymentStatus};
use super::developer::DeveloperId;

/// Flat listing fee in major currency units.
pub const LISTING_FEE: u32 = 1000;
/// Currency every listing fee is charged in.
pub const LISTING_CURRENCY: &str = "KES";
const REFERENCE_SUFFIX_LEN: usize = 10;

/// Convert a major-unit amount to the provider's minor units.
pub const fn to_minor_units(amount: u32) -> u64 {
    amount as u64 * 100
}

/// Stable payment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation reference sent to the provider: `app_<appId>_<10 alphanumerics>`.
///
/// # Examples
/// ```
/// use medstore::domain::{AppId, PaymentReference};
///
/// let app_id = AppId::random();
/// let reference = PaymentReference::generate(&app_id);
/// assert!(reference.as_ref().starts_with(&format!("app_{app_id}_")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Generate a fresh reference for `app_id`.
    pub fn generate(app_id: &AppId) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFERENCE_SUFFIX_LEN)
            .map(char::from)
            .collect();
        Self(format!("app_{app_id}_{suffix}"))
    }

    /// Wrap a reference received from a client or the provider.
    ///
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PaymentReference {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single listing-fee attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub app_id: AppId,
    pub developer_id: DeveloperId,
    pub amount: u32,
    pub currency: String,
    pub reference: PaymentReference,
    pub provider_reference: PaymentReference,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Record a newly initialised attempt.
    pub fn initialised(
        app_id: AppId,
        developer_id: DeveloperId,
        reference: PaymentReference,
        provider_reference: PaymentReference,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PaymentId::random(),
            app_id,
            developer_id,
            amount: LISTING_FEE,
            currency: LISTING_CURRENCY.to_owned(),
            reference,
            provider_reference,
            status: PaymentStatus::Pending,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Final verdict for a pending attempt, written together with the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSettlement {
    pub payment_id: PaymentId,
    pub app_id: AppId,
    /// `Completed` or `Failed`.
    pub outcome: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub settled_at: DateTime<Utc>,
}

/// What a new initialization attempt does to the app's payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Leave the app's payment status untouched until verification.
    Proceed,
    /// Reset a failed app back to `pending` before charging again.
    ProceedAndReset,
}

/// Why an initialization attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RetryRefusal {
    #[error("listing fee already paid for this app")]
    AlreadyPaid,
    #[error("payment retries are disabled after a failed attempt")]
    RetriesDisabled,
}

/// Policy for initialising a payment on an app whose status is not `pending`.
///
/// Completed apps are refused under every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentRetryPolicy {
    /// New attempts are always allowed; the app keeps its status until verified.
    #[default]
    Allow,
    /// New attempts are allowed and reset a failed app to `pending`.
    AllowAndReset,
    /// No new attempts once one has failed.
    Deny,
}

impl PaymentRetryPolicy {
    /// Decide whether an attempt may start given the app's payment status.
    ///
    /// # Examples
    /// ```
    /// use medstore::domain::{PaymentRetryPolicy, PaymentStatus, RetryDecision, RetryRefusal};
    ///
    /// let policy = PaymentRetryPolicy::AllowAndReset;
    /// assert_eq!(policy.check(PaymentStatus::Failed), Ok(RetryDecision::ProceedAndReset));
    /// assert_eq!(policy.check(PaymentStatus::Completed), Err(RetryRefusal::AlreadyPaid));
    /// ```
    pub fn check(self, current: PaymentStatus) -> Result<RetryDecision, RetryRefusal> {
        match (self, current) {
            (_, PaymentStatus::Completed) => Err(RetryRefusal::AlreadyPaid),
            (_, PaymentStatus::Pending) | (Self::Allow, PaymentStatus::Failed) => {
                Ok(RetryDecision::Proceed)
            }
            (Self::AllowAndReset, PaymentStatus::Failed) => Ok(RetryDecision::ProceedAndReset),
            (Self::Deny, PaymentStatus::Failed) => Err(RetryRefusal::RetriesDisabled),
        }
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment retry policy '{0}'")]
pub struct UnknownRetryPolicy(pub String);

impl FromStr for PaymentRetryPolicy {
    type Err = UnknownRetryPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "allow-and-reset" => Ok(Self::AllowAndReset),
            "deny" => Ok(Self::Deny),
            _ => Err(UnknownRetryPolicy(s.to_owned())),
        }
    }
}
