//! Marketplace apps and their submission metadata.
//!
//! An app is created by its developer in `(pending, pending)` and then moves
//! through payment and moderation. Status and payment status are owned by the
//! submission lifecycle; developers may only edit descriptive metadata.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use super::developer::{Developer, DeveloperId};
use super::payment::PaymentId;

/// Minimum app name length in characters.
pub const APP_NAME_MIN: usize = 2;
/// Minimum description length in characters.
pub const APP_DESCRIPTION_MIN: usize = 10;
/// Exact number of screenshots every submission carries.
pub const SCREENSHOT_COUNT: usize = 4;
/// Upper bound of the rating scale.
pub const RATING_MAX: f64 = 5.0;

/// URL-bearing fields of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    Logo,
    Download,
}

impl UrlField {
    fn as_str(self) -> &'static str {
        match self {
            Self::Logo => "logoUrl",
            Self::Download => "downloadUrl",
        }
    }
}

/// Validation failures for app submissions, updates and moderation input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppValidationError {
    #[error("app id must be a valid UUID")]
    InvalidId,
    #[error("name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("description must be at least {min} characters")]
    DescriptionTooShort { min: usize },
    #[error("unknown category '{value}'")]
    UnknownCategory { value: String },
    #[error("{} must be an absolute http(s) URL", .field.as_str())]
    InvalidUrl { field: UrlField },
    #[error("exactly {expected} screenshots are required, got {actual}")]
    ScreenshotCount { expected: usize, actual: usize },
    #[error("screenshot {index} must be an absolute http(s) URL")]
    InvalidScreenshotUrl { index: usize },
    #[error("unknown status '{value}'")]
    UnknownStatus { value: String },
    #[error("rating must be between 0 and {max}")]
    RatingOutOfRange { max: f64 },
}

impl AppValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::NameTooShort { .. } => "name",
            Self::DescriptionTooShort { .. } => "description",
            Self::UnknownCategory { .. } => "category",
            Self::InvalidUrl { field } => field.as_str(),
            Self::ScreenshotCount { .. } | Self::InvalidScreenshotUrl { .. } => "screenshots",
            Self::UnknownStatus { .. } => "status",
            Self::RatingOutOfRange { .. } => "rating",
        }
    }

    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::NameTooShort { .. } | Self::DescriptionTooShort { .. } => "too_short",
            Self::UnknownCategory { .. } => "invalid_category",
            Self::InvalidUrl { .. } | Self::InvalidScreenshotUrl { .. } => "invalid_url",
            Self::ScreenshotCount { .. } => "invalid_screenshot_count",
            Self::UnknownStatus { .. } => "invalid_status",
            Self::RatingOutOfRange { .. } => "out_of_range",
        }
    }
}

/// Stable app identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId(Uuid);

impl AppId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the textual identifier used in paths and request bodies.
    pub fn parse(raw: &str) -> Result<Self, AppValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| AppValidationError::InvalidId)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalogue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCategory {
    MedicalEducation,
    HealthMonitoring,
    Pharmacy,
    Anatomy,
    Other,
}

impl AppCategory {
    /// Display label, also used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MedicalEducation => "Medical Education",
            Self::HealthMonitoring => "Health Monitoring",
            Self::Pharmacy => "Pharmacy",
            Self::Anatomy => "Anatomy",
            Self::Other => "Other",
        }
    }

    /// Every category in display order.
    pub const ALL: [Self; 5] = [
        Self::MedicalEducation,
        Self::HealthMonitoring,
        Self::Pharmacy,
        Self::Anatomy,
        Self::Other,
    ];
}

impl FromStr for AppCategory {
    type Err = AppValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AppValidationError::UnknownCategory {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for AppCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation status. Any status may move to any other by administrator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppStatus {
    Pending,
    Published,
    Rejected,
}

impl AppStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for AppStatus {
    type Err = AppValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "published" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            other => Err(AppValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing-fee state shared by apps and payment attempts.
///
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(AppValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_http_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).ok()?;
    if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() {
        Some(trimmed.to_owned())
    } else {
        None
    }
}

/// Absolute http(s) URL for a logo, download or screenshot asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrl(String);

impl AssetUrl {
    /// Validate a URL for the given field.
    pub fn new(raw: &str, field: UrlField) -> Result<Self, AppValidationError> {
        parse_http_url(raw)
            .map(Self)
            .ok_or(AppValidationError::InvalidUrl { field })
    }

    /// Wrap a URL read back from storage.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for AssetUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Exactly [`SCREENSHOT_COUNT`] screenshot URLs.
///
/// # Examples
/// ```
/// use medstore::domain::Screenshots;
///
/// let urls: Vec<String> = (1..=4).map(|n| format!("https://cdn.example/{n}.png")).collect();
/// assert!(Screenshots::new(&urls).is_ok());
/// assert!(Screenshots::new(&urls[..3]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshots(Vec<AssetUrl>);

impl Screenshots {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Result<Self, AppValidationError> {
        if raw.len() != SCREENSHOT_COUNT {
            return Err(AppValidationError::ScreenshotCount {
                expected: SCREENSHOT_COUNT,
                actual: raw.len(),
            });
        }
        raw.iter()
            .enumerate()
            .map(|(index, url)| {
                parse_http_url(url.as_ref())
                    .map(AssetUrl)
                    .ok_or(AppValidationError::InvalidScreenshotUrl { index })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub(crate) fn from_stored(raw: Vec<String>) -> Self {
        Self(raw.into_iter().map(AssetUrl::from_stored).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetUrl> {
        self.0.iter()
    }

    /// Owned string copies, in submission order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|url| url.0.clone()).collect()
    }
}

fn at_least(raw: &str, min: usize) -> Option<String> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= min).then(|| trimmed.to_owned())
}

/// App name (at least [`APP_NAME_MIN`] characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppName(String);

impl AppName {
    pub fn new(raw: &str) -> Result<Self, AppValidationError> {
        at_least(raw, APP_NAME_MIN)
            .map(Self)
            .ok_or(AppValidationError::NameTooShort { min: APP_NAME_MIN })
    }

    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for AppName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// App description (at least [`APP_DESCRIPTION_MIN`] characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescription(String);

impl AppDescription {
    pub fn new(raw: &str) -> Result<Self, AppValidationError> {
        at_least(raw, APP_DESCRIPTION_MIN)
            .map(Self)
            .ok_or(AppValidationError::DescriptionTooShort {
                min: APP_DESCRIPTION_MIN,
            })
    }

    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for AppDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Average user rating in `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Rating(f64);

impl Rating {
    pub fn new(value: f64) -> Result<Self, AppValidationError> {
        if value.is_finite() && (0.0..=RATING_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppValidationError::RatingOutOfRange { max: RATING_MAX })
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Validated metadata for a new submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSubmission {
    pub name: AppName,
    pub description: AppDescription,
    pub category: AppCategory,
    pub logo_url: AssetUrl,
    pub download_url: AssetUrl,
    pub screenshots: Screenshots,
}

/// Developer-editable subset of app metadata. Absent fields stay unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppUpdate {
    pub name: Option<AppName>,
    pub description: Option<AppDescription>,
    pub category: Option<AppCategory>,
    pub logo_url: Option<AssetUrl>,
    pub download_url: Option<AssetUrl>,
    pub screenshots: Option<Screenshots>,
}

impl AppUpdate {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.logo_url.is_none()
            && self.download_url.is_none()
            && self.screenshots.is_none()
    }
}

/// Marketplace app aggregate.
///
/// `developer_name` is a snapshot of the owner's name taken at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub id: AppId,
    pub name: AppName,
    pub description: AppDescription,
    pub category: AppCategory,
    pub logo_url: AssetUrl,
    pub download_url: AssetUrl,
    pub screenshots: Screenshots,
    pub developer_id: DeveloperId,
    pub developer_name: String,
    pub status: AppStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<PaymentId>,
    pub rating: Rating,
    pub downloads: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl App {
    /// Build a freshly submitted app owned by `developer`.
    pub fn submitted(
        id: AppId,
        submission: AppSubmission,
        developer: &Developer,
        now: DateTime<Utc>,
    ) -> Self {
        let AppSubmission {
            name,
            description,
            category,
            logo_url,
            download_url,
            screenshots,
        } = submission;
        Self {
            id,
            name,
            description,
            category,
            logo_url,
            download_url,
            screenshots,
            developer_id: developer.id,
            developer_name: developer.name.as_ref().to_owned(),
            status: AppStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            rating: Rating::default(),
            downloads: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a developer edit and bump `updated_at`.
    pub fn apply(&mut self, update: AppUpdate, now: DateTime<Utc>) {
        let AppUpdate {
            name,
            description,
            category,
            logo_url,
            download_url,
            screenshots,
        } = update;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(logo_url) = logo_url {
            self.logo_url = logo_url;
        }
        if let Some(download_url) = download_url {
            self.download_url = download_url;
        }
        if let Some(screenshots) = screenshots {
            self.screenshots = screenshots;
        }
        self.updated_at = now;
    }

    pub fn is_owned_by(&self, developer_id: &DeveloperId) -> bool {
        &self.developer_id == developer_id
    }
}
