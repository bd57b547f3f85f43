//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! A thin wrapper around Actix sessions so handlers only deal with
//! persisting, reading or clearing the signed-in developer's id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{DeveloperId, Error};

pub(crate) const DEVELOPER_ID_KEY: &str = "developer_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated developer's id in the session cookie.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused.
    pub fn persist_developer(&self, developer_id: &DeveloperId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(DEVELOPER_ID_KEY, developer_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Current developer id, or `None` when absent or unreadable.
    pub fn developer_id(&self) -> Result<Option<DeveloperId>, Error> {
        let raw = self
            .0
            .get::<String>(DEVELOPER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match DeveloperId::parse(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid developer id in session cookie");
                None
            }
        }))
    }

    /// Require a signed-in developer or return `401 Unauthorized`.
    pub fn require_developer_id(&self) -> Result<DeveloperId, Error> {
        self.developer_id()?
            .ok_or_else(|| Error::unauthorized("Not authenticated"))
    }

    /// Drop every session entry and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
