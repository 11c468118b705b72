//! Authentication service: principal resolution followed by provisioning.

use async_trait::async_trait;

use super::ports::{PrincipalAuthenticator, UserProfileRepository};
use super::{Error, PrincipalResolver, RequestCredentials, UserProfile, UserProvisioner};

/// Implements [`PrincipalAuthenticator`] as `resolve` then `provision_if_absent`.
pub struct AuthenticationService<R> {
    resolver: PrincipalResolver,
    provisioner: UserProvisioner<R>,
}

impl<R> AuthenticationService<R> {
    pub fn new(resolver: PrincipalResolver, provisioner: UserProvisioner<R>) -> Self {
        Self {
            resolver,
            provisioner,
        }
    }
}

#[async_trait]
impl<R> PrincipalAuthenticator for AuthenticationService<R>
where
    R: UserProfileRepository,
{
    async fn authenticate(&self, credentials: &RequestCredentials) -> Result<UserProfile, Error> {
        let identity = self.resolver.resolve(credentials).await?.into_identity()?;
        self.provisioner.provision_if_absent(&identity).await
    }
}
