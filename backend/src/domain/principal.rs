//! Principal resolution over ordered credential channels.
//!
//! Each [`PrincipalSource`] inspects one channel and answers "identity",
//! "nothing here" or "could not ask". The [`PrincipalResolver`] tries its
//! sources in order and the first identity wins. A source that cannot reach
//! the provider stops resolution with a retryable error rather than falling
//! through to a weaker answer.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::port_error_mapping::map_auth_provider_error;
use super::ports::{AuthProvider, AuthProviderError};
use super::{Error, ExternalIdentity, RequestCredentials};

/// Credential channel a principal was resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialChannel {
    /// `Authorization: Bearer` header.
    Bearer,
    /// Provider session token kept in the cookie session.
    AmbientSession,
}

impl fmt::Display for CredentialChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => f.write_str("bearer"),
            Self::AmbientSession => f.write_str("ambient_session"),
        }
    }
}

/// One strategy for turning request credentials into an identity.
#[async_trait]
pub trait PrincipalSource: Send + Sync {
    /// Channel inspected by this source.
    fn channel(&self) -> CredentialChannel;

    /// Return the identity carried by this channel, if any.
    async fn identify(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError>;
}

/// Validates the bearer credential with the provider.
pub struct BearerPrincipalSource {
    provider: Arc<dyn AuthProvider>,
}

impl BearerPrincipalSource {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PrincipalSource for BearerPrincipalSource {
    fn channel(&self) -> CredentialChannel {
        CredentialChannel::Bearer
    }

    async fn identify(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        match &credentials.bearer {
            Some(token) => self.provider.validate_bearer(token).await,
            None => Ok(None),
        }
    }
}

/// Reads the provider session stored in the cookie session.
pub struct AmbientSessionPrincipalSource {
    provider: Arc<dyn AuthProvider>,
}

impl AmbientSessionPrincipalSource {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PrincipalSource for AmbientSessionPrincipalSource {
    fn channel(&self) -> CredentialChannel {
        CredentialChannel::AmbientSession
    }

    async fn identify(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        match &credentials.ambient_session {
            Some(session) => self.provider.read_ambient_session(session).await,
            None => Ok(None),
        }
    }
}

/// Terminal state of principal resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum PrincipalResolution {
    Resolved {
        identity: ExternalIdentity,
        channel: CredentialChannel,
    },
    Unauthenticated,
}

impl PrincipalResolution {
    /// Turn an unauthenticated outcome into a 401-class domain error.
    pub fn into_identity(self) -> Result<ExternalIdentity, Error> {
        match self {
            Self::Resolved { identity, .. } => Ok(identity),
            Self::Unauthenticated => Err(Error::unauthorized("login required")),
        }
    }
}

/// Ordered list of principal sources; first success wins.
#[derive(Clone)]
pub struct PrincipalResolver {
    sources: Vec<Arc<dyn PrincipalSource>>,
}

impl PrincipalResolver {
    /// Build a resolver over explicit sources, tried in the given order.
    pub fn new(sources: Vec<Arc<dyn PrincipalSource>>) -> Self {
        Self { sources }
    }

    /// Bearer first, then the ambient session.
    pub fn with_default_channels(provider: Arc<dyn AuthProvider>) -> Self {
        Self::new(vec![
            Arc::new(BearerPrincipalSource::new(Arc::clone(&provider))),
            Arc::new(AmbientSessionPrincipalSource::new(provider)),
        ])
    }

    /// Resolve the principal behind `credentials`.
    ///
    /// An invalid credential on one channel falls through to the next;
    /// a provider failure on any channel is returned as a retryable error.
    pub async fn resolve(&self, credentials: &RequestCredentials) -> Result<PrincipalResolution, Error> {
        for source in &self.sources {
            let channel = source.channel();
            match source
                .identify(credentials)
                .await
                .map_err(map_auth_provider_error)?
            {
                Some(identity) => {
                    debug!(%channel, external_id = %identity.external_id, "principal resolved");
                    return Ok(PrincipalResolution::Resolved { identity, channel });
                }
                None => debug!(%channel, "channel yielded no identity"),
            }
        }
        Ok(PrincipalResolution::Unauthenticated)
    }
}
