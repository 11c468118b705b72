//! First-contact provisioning of application profiles.
//!
//! Provisioning runs after principal resolution and before anything that
//! needs an internal profile. It is idempotent: concurrent first requests
//! from one identity race on the repository's unique constraints and the
//! loser re-reads the winner's row.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use super::port_error_mapping::map_profile_error;
use super::ports::{UserProfileRepository, UserProfileRepositoryError};
use super::{Error, ExternalIdentity, ProfileId, ProfileRole, UserProfile};

/// Creates or links the profile behind a resolved identity.
pub struct UserProvisioner<R> {
    profiles: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for UserProvisioner<R> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R> UserProvisioner<R> {
    pub fn new(profiles: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }
}

impl<R> UserProvisioner<R>
where
    R: UserProfileRepository,
{
    /// Return the profile for `identity`, creating or linking one if needed.
    pub async fn provision_if_absent(&self, identity: &ExternalIdentity) -> Result<UserProfile, Error> {
        if let Some(profile) = self.find_by_external_id(identity).await? {
            return Ok(profile);
        }
        if let Some(profile) = self.find_by_email(identity).await? {
            return self.link_or_keep(profile, identity).await;
        }
        self.create(identity).await
    }

    async fn find_by_external_id(
        &self,
        identity: &ExternalIdentity,
    ) -> Result<Option<UserProfile>, Error> {
        self.profiles
            .find_by_external_id(&identity.external_id)
            .await
            .map_err(map_profile_error)
    }

    async fn find_by_email(&self, identity: &ExternalIdentity) -> Result<Option<UserProfile>, Error> {
        self.profiles
            .find_by_email(&identity.email)
            .await
            .map_err(map_profile_error)
    }

    async fn link_or_keep(
        &self,
        profile: UserProfile,
        identity: &ExternalIdentity,
    ) -> Result<UserProfile, Error> {
        if let Some(existing) = &profile.external_id {
            warn!(
                profile_id = %profile.id,
                linked_external_id = %existing,
                presented_external_id = %identity.external_id,
                "email matches a profile linked to another identity; keeping existing link"
            );
            return Ok(profile);
        }

        let linked = self
            .profiles
            .link_external_id(&profile.id, &identity.external_id)
            .await
            .map_err(map_profile_error)?;
        match linked {
            Some(linked) => {
                info!(
                    profile_id = %linked.id,
                    external_id = %identity.external_id,
                    "linked identity to existing profile"
                );
                Ok(linked)
            }
            None => self.reread_after_race(identity).await,
        }
    }

    async fn create(&self, identity: &ExternalIdentity) -> Result<UserProfile, Error> {
        let profile = UserProfile {
            id: ProfileId::random(),
            external_id: Some(identity.external_id.clone()),
            email: identity.email.clone(),
            full_name: identity.display_name(),
            role: ProfileRole::Owner,
            is_active: true,
            avatar_url: identity.avatar_url(),
            locale: identity.locale(),
            created_at: self.clock.utc(),
        };

        match self.profiles.insert(&profile).await {
            Ok(()) => {
                info!(
                    profile_id = %profile.id,
                    external_id = %identity.external_id,
                    "provisioned new profile"
                );
                Ok(profile)
            }
            Err(UserProfileRepositoryError::Duplicate { constraint }) => {
                info!(
                    external_id = %identity.external_id,
                    %constraint,
                    "profile created concurrently; re-reading"
                );
                self.reread_after_race(identity).await
            }
            Err(err) => Err(map_profile_error(err)),
        }
    }

    async fn reread_after_race(&self, identity: &ExternalIdentity) -> Result<UserProfile, Error> {
        if let Some(profile) = self.find_by_external_id(identity).await? {
            return Ok(profile);
        }
        if let Some(profile) = self.find_by_email(identity).await? {
            if !profile.is_linked_to(&identity.external_id) {
                warn!(
                    profile_id = %profile.id,
                    presented_external_id = %identity.external_id,
                    "email owner changed during provisioning; keeping existing link"
                );
            }
            return Ok(profile);
        }
        Err(Error::internal("profile vanished while resolving a provisioning race"))
    }
}

#[cfg(test)]
#[path = "provisioning_tests.rs"]
mod tests;
