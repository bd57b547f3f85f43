//! Driving port guarding administrative endpoints.

use crate::domain::Error;

/// Checks a presented bearer token.
///
/// Returns `forbidden` when administration is disabled and `unauthorized`
/// when the token is missing or wrong.
pub trait AdminAuthenticator: Send + Sync {
    fn authorize(&self, bearer: Option<&str>) -> Result<(), Error>;
}
