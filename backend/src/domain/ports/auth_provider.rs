//! Driven port for the hosted identity provider.
//!
//! The provider is the only authority on credentials. Adapters translate its
//! responses into [`ExternalIdentity`] values and keep the distinction between
//! "this credential is not valid" (`Ok(None)`) and "the provider could not be
//! asked" (`Err`).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{AmbientSession, BearerToken, ExternalIdentity};

use super::define_port_error;

define_port_error! {
    /// Errors raised while talking to the identity provider.
    pub enum AuthProviderError {
        /// The provider could not be reached or answered with a server error.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// The provider did not answer within the configured timeout.
        Timeout { message: String } => "identity provider timed out: {message}",
        /// The provider answered with a payload that could not be understood.
        InvalidResponse { message: String } =>
            "identity provider returned an invalid response: {message}",
    }
}

/// Port for validating credentials with the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Validate a bearer credential.
    ///
    /// Returns `Ok(None)` when the token is invalid, expired or revoked.
    async fn validate_bearer(
        &self,
        token: &BearerToken,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError>;

    /// Read the identity behind an ambient cookie session.
    ///
    /// Returns `Ok(None)` when the session is unknown or has lapsed.
    async fn read_ambient_session(
        &self,
        session: &AmbientSession,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError>;
}

/// Fixture provider backed by fixed token tables.
///
/// Unknown tokens are treated as invalid. Use it for local development and
/// HTTP tests where the real provider is not reachable.
///
/// # Examples
/// ```
/// use listings::domain::ports::FixtureAuthProvider;
/// use listings::domain::{Email, ExternalId, ExternalIdentity};
///
/// let identity = ExternalIdentity::new(
///     ExternalId::new("sub-1").expect("id"),
///     Email::new("ada@example.com").expect("email"),
/// );
/// let provider = FixtureAuthProvider::default().with_bearer("token-a", identity);
/// # let _ = provider;
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixtureAuthProvider {
    bearer: HashMap<String, ExternalIdentity>,
    sessions: HashMap<String, ExternalIdentity>,
}

impl FixtureAuthProvider {
    /// Accept `token` as a bearer credential for `identity`.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>, identity: ExternalIdentity) -> Self {
        self.bearer.insert(token.into(), identity);
        self
    }

    /// Accept `token` as an ambient session for `identity`.
    #[must_use]
    pub fn with_session(mut self, token: impl Into<String>, identity: ExternalIdentity) -> Self {
        self.sessions.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl AuthProvider for FixtureAuthProvider {
    async fn validate_bearer(
        &self,
        token: &BearerToken,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        Ok(self.bearer.get(token.expose()).cloned())
    }

    async fn read_ambient_session(
        &self,
        session: &AmbientSession,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        Ok(self.sessions.get(session.expose()).cloned())
    }
}
