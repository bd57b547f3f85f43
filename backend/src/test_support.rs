//! Test utilities shared by unit tests across the crate.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    App, AppCategory, AppDescription, AppId, AppName, AppSubmission, AssetUrl, Developer,
    DeveloperId, DeveloperName, EmailAddress, PasswordDigest, Screenshots, UrlField,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn screenshot_urls(count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| format!("https://cdn.example.com/shot-{n}.png"))
        .collect()
}

/// Developer with a placeholder digest; hash a real password when a test
/// needs credential checks.
pub(crate) fn sample_developer() -> Developer {
    Developer {
        id: DeveloperId::random(),
        email: EmailAddress::new("d@x.com").expect("fixture email"),
        name: DeveloperName::new("Dana Dev").expect("fixture name"),
        company: None,
        password_digest: PasswordDigest::from_phc("$argon2id$placeholder"),
        created_at: fixture_timestamp(),
        is_verified: false,
    }
}

pub(crate) fn sample_submission(name: &str) -> AppSubmission {
    AppSubmission {
        name: AppName::new(name).expect("fixture app name"),
        description: AppDescription::new("Flashcards for clinical pharmacology")
            .expect("fixture description"),
        category: AppCategory::Pharmacy,
        logo_url: AssetUrl::new("https://cdn.example.com/logo.png", UrlField::Logo)
            .expect("fixture logo"),
        download_url: AssetUrl::new("https://apps.example.com/foo.apk", UrlField::Download)
            .expect("fixture download"),
        screenshots: Screenshots::new(&screenshot_urls(4)).expect("fixture screenshots"),
    }
}

pub(crate) fn sample_app(developer: &Developer) -> App {
    App::submitted(
        AppId::random(),
        sample_submission("Foo"),
        developer,
        fixture_timestamp(),
    )
}
