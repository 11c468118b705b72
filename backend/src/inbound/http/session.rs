//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session carries one value: the provider session token captured
//! when the caller established an ambient session. Handlers only see it as an
//! [`AmbientSession`] credential.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AmbientSession, BearerToken, Error};

pub(crate) const AUTH_SESSION_KEY: &str = "auth_session";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the provider token so later requests can authenticate ambiently.
    pub fn persist_provider_session(&self, token: &BearerToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(AUTH_SESSION_KEY, token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the stored provider session, if any.
    ///
    /// An unreadable cookie value counts as no session rather than an error.
    pub fn ambient_session(&self) -> Option<AmbientSession> {
        match self.0.get::<String>(AUTH_SESSION_KEY) {
            Ok(Some(raw)) => AmbientSession::new(&raw),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "unreadable session cookie ignored");
                None
            }
        }
    }

    /// Drop everything held in the session.
    pub fn clear(&self) {
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
