//! Driving port turning request credentials into a provisioned profile.
//!
//! Inbound adapters call this first on every protected route. Handler tests
//! substitute a double instead of wiring a provider and a repository.

use async_trait::async_trait;

use crate::domain::{Error, RequestCredentials, UserProfile};

/// Domain use-case port for authenticating a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalAuthenticator: Send + Sync {
    /// Resolve the principal and return its profile, provisioning on first
    /// contact. Fails with an unauthorised error when no channel yields an
    /// identity.
    async fn authenticate(&self, credentials: &RequestCredentials) -> Result<UserProfile, Error>;
}
