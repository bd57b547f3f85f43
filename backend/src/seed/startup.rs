//! Demo data applied once at startup.

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::domain::credentials::{CredentialHashError, hash_password};
use crate::domain::ports::{
    AppRepository, AppRepositoryError, DeveloperRepository, DeveloperRepositoryError,
};
use crate::domain::{
    App, AppCategory, AppDescription, AppId, AppName, AppStatus, AppSubmission,
    AppValidationError, AssetUrl, Developer, DeveloperId, DeveloperName,
    DeveloperValidationError, EmailAddress, PaymentStatus, Rating, Screenshots, UrlField,
};

use super::SeedSettings;

const DEMO_NAME: &str = "MED-A Team";
const DEMO_COMPANY: &str = "Medical Education Solutions";
const DEMO_APP_NAME: &str = "MED-A";
const DEMO_APP_DESCRIPTION: &str = "Welcome to MED-A! Your go-to app for accessing past exam \
papers from Kenya Medical Training College (KMTC). Whether you're a KMTC student or enrolled in \
a private institution offering courses like nursing and more, MED-A is here to support your \
studies with valuable resources to help you succeed. Start exploring and enhance your learning \
experience today!";
const DEMO_LOGO_URL: &str = "https://via.placeholder.com/120x120/4F46E5/ffffff?text=MED-A";
const DEMO_DOWNLOAD_URL: &str = "https://example.com/download/med-a.apk";
const DEMO_RATING: f64 = 4.8;
const DEMO_DOWNLOADS: u64 = 1250;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid demo developer: {0}")]
    Developer(#[from] DeveloperValidationError),
    #[error("invalid demo app: {0}")]
    App(#[from] AppValidationError),
    #[error(transparent)]
    Hash(#[from] CredentialHashError),
    #[error(transparent)]
    DeveloperStore(#[from] DeveloperRepositoryError),
    #[error(transparent)]
    AppStore(#[from] AppRepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Disabled,
    /// The demo developer already exists; nothing was written.
    AlreadySeeded,
    Applied {
        developer_id: DeveloperId,
        app_id: AppId,
    },
}

fn demo_submission() -> Result<AppSubmission, AppValidationError> {
    let screenshots: Vec<String> = (1..=4)
        .map(|n| format!("https://via.placeholder.com/400x600/4F46E5/ffffff?text=Screenshot+{n}"))
        .collect();
    Ok(AppSubmission {
        name: AppName::new(DEMO_APP_NAME)?,
        description: AppDescription::new(DEMO_APP_DESCRIPTION)?,
        category: AppCategory::MedicalEducation,
        logo_url: AssetUrl::new(DEMO_LOGO_URL, UrlField::Logo)?,
        download_url: AssetUrl::new(DEMO_DOWNLOAD_URL, UrlField::Download)?,
        screenshots: Screenshots::new(&screenshots)?,
    })
}

/// Create the demo developer and its published, paid MED-A app.
///
/// Idempotent on the developer email: a second run reports
/// [`SeedOutcome::AlreadySeeded`].
pub async fn seed_demo_data(
    settings: &SeedSettings,
    developers: &dyn DeveloperRepository,
    apps: &dyn AppRepository,
    clock: &dyn Clock,
) -> Result<SeedOutcome, SeedError> {
    if !settings.enabled {
        info!(reason = "disabled", "demo seeding skipped");
        return Ok(SeedOutcome::Disabled);
    }

    let email = EmailAddress::new(settings.developer_email())?;
    if developers.find_by_email(&email).await?.is_some() {
        info!(email = email.as_ref(), "demo developer already present; skipping");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let now = clock.utc();
    let developer = Developer {
        id: DeveloperId::random(),
        email,
        name: DeveloperName::new(DEMO_NAME)?,
        company: Some(DEMO_COMPANY.to_owned()),
        password_digest: hash_password(settings.developer_password())?,
        created_at: now,
        is_verified: true,
    };
    match developers.insert(&developer).await {
        Ok(()) => {}
        Err(DeveloperRepositoryError::DuplicateEmail { .. }) => {
            return Ok(SeedOutcome::AlreadySeeded);
        }
        Err(err) => return Err(err.into()),
    }

    let mut app = App::submitted(AppId::random(), demo_submission()?, &developer, now);
    app.status = AppStatus::Published;
    app.payment_status = PaymentStatus::Completed;
    app.rating = Rating::new(DEMO_RATING)?;
    app.downloads = DEMO_DOWNLOADS;
    apps.insert(&app).await?;

    info!(
        developer_id = %developer.id,
        app_id = %app.id,
        "demo developer and app seeded"
    );
    Ok(SeedOutcome::Applied {
        developer_id: developer.id,
        app_id: app.id,
    })
}
