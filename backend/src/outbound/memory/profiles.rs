//! In-memory user profile repository.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::yield_now;

use super::lock;
use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{Email, ExternalId, ProfileId, UserProfile};

/// Profile store keyed by internal id with unique external id and email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserProfileRepository {
    rows: Arc<Mutex<Vec<UserProfile>>>,
}

impl InMemoryUserProfileRepository {
    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        lock(&self.rows).map_or(0, |rows| rows.len())
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(
        &self,
        predicate: impl Fn(&UserProfile) -> bool,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let rows = lock(&self.rows).map_err(UserProfileRepositoryError::query)?;
        Ok(rows.iter().find(|row| predicate(row)).cloned())
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn find_by_id(
        &self,
        id: &ProfileId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        yield_now().await;
        self.find(|row| row.id == *id)
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        yield_now().await;
        self.find(|row| row.is_linked_to(external_id))
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        yield_now().await;
        self.find(|row| row.email == *email)
    }

    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        yield_now().await;
        let mut rows = lock(&self.rows).map_err(UserProfileRepositoryError::query)?;
        if rows.iter().any(|row| row.id == profile.id) {
            return Err(UserProfileRepositoryError::duplicate("user_profiles_pkey"));
        }
        if let Some(external_id) = &profile.external_id
            && rows.iter().any(|row| row.is_linked_to(external_id))
        {
            return Err(UserProfileRepositoryError::duplicate(
                "user_profiles_external_id_key",
            ));
        }
        if rows.iter().any(|row| row.email == profile.email) {
            return Err(UserProfileRepositoryError::duplicate("user_profiles_email_key"));
        }
        rows.push(profile.clone());
        Ok(())
    }

    async fn link_external_id(
        &self,
        id: &ProfileId,
        external_id: &ExternalId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        yield_now().await;
        let mut rows = lock(&self.rows).map_err(UserProfileRepositoryError::query)?;
        if rows.iter().any(|row| row.is_linked_to(external_id)) {
            return Err(UserProfileRepositoryError::duplicate(
                "user_profiles_external_id_key",
            ));
        }
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id == *id && row.external_id.is_none())
        else {
            return Ok(None);
        };
        row.external_id = Some(external_id.clone());
        Ok(Some(row.clone()))
    }
}
