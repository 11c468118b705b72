//! Authentication helpers used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by gathering
//! request credentials and resolving the caller's profile here.

use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AmbientSession, BearerToken, Error, RequestCredentials, UserProfile};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Read the bearer token from the `Authorization` header.
///
/// Absent, non-UTF-8 or non-bearer values all mean "no bearer".
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<BearerToken> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BearerToken::from_authorization_header)
}

/// Gather every credential channel the request carries.
pub fn request_credentials(
    headers: &HeaderMap,
    ambient_session: Option<AmbientSession>,
) -> RequestCredentials {
    RequestCredentials {
        bearer: bearer_from_headers(headers),
        ambient_session,
    }
}

/// The authenticated, provisioned caller of a protected route.
///
/// Extraction fails with `401` when no channel yields an identity and with
/// `503` when the provider or the profile store cannot be reached.
#[derive(Debug, Clone)]
pub struct Caller(pub UserProfile);

impl Caller {
    pub fn into_inner(self) -> UserProfile {
        self.0
    }
}

impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let headers = req.headers().clone();
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state not configured"))?;
            let ambient = session.await.ok().and_then(|ctx| ctx.ambient_session());
            let credentials = request_credentials(&headers, ambient);
            let profile = state.authenticator.authenticate(&credentials).await?;
            Ok(Caller(profile))
        })
    }
}
