//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::UserProfile;
use crate::domain::ports::{
    MockPrincipalAuthenticator, MockPropertyCommand, MockPropertyMediaCommand, MockPropertyQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Authenticator double that accepts every request as `profile`.
pub fn authenticated_as(profile: UserProfile) -> MockPrincipalAuthenticator {
    let mut authenticator = MockPrincipalAuthenticator::new();
    authenticator
        .expect_authenticate()
        .returning(move |_| Ok(profile.clone()));
    authenticator
}

/// Port doubles for one handler test; unset expectations panic when hit.
#[derive(Default)]
pub struct MockPorts {
    pub authenticator: MockPrincipalAuthenticator,
    pub properties: MockPropertyQuery,
    pub property_commands: MockPropertyCommand,
    pub media: MockPropertyMediaCommand,
}

impl MockPorts {
    /// Start from an authenticator that always yields `profile`.
    pub fn for_caller(profile: UserProfile) -> Self {
        Self {
            authenticator: authenticated_as(profile),
            ..Self::default()
        }
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::from(HttpStatePorts {
            authenticator: Arc::new(self.authenticator),
            properties: Arc::new(self.properties),
            property_commands: Arc::new(self.property_commands),
            media: Arc::new(self.media),
        }))
    }
}
