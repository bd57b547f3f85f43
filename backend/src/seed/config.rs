//! Seed configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

pub(crate) const DEFAULT_DEVELOPER_EMAIL: &str = "developer@med-a.com";
const DEFAULT_DEVELOPER_PASSWORD: &str = "password123";

/// Controls whether the demo account and app are created at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEED")]
pub struct SeedSettings {
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Login email of the demo developer.
    pub developer_email: Option<String>,
    /// Plain-text password hashed on insert.
    pub developer_password: Option<String>,
}

impl SeedSettings {
    pub fn developer_email(&self) -> &str {
        self.developer_email
            .as_deref()
            .unwrap_or(DEFAULT_DEVELOPER_EMAIL)
    }

    pub fn developer_password(&self) -> &str {
        self.developer_password
            .as_deref()
            .unwrap_or(DEFAULT_DEVELOPER_PASSWORD)
    }
}
