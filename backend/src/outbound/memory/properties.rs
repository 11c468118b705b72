//! In-memory listing repository and status audit log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::yield_now;

use super::lock;
use crate::domain::ports::{
    PropertyRepository, PropertyRepositoryError, StatusTransitionRepository,
    StatusTransitionRepositoryError,
};
use crate::domain::{
    ProfileId, Property, PropertyId, PropertyStatus, ShortCode, StatusTransition,
};

/// Listing store with a unique short code and compare-and-swap status.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPropertyRepository {
    rows: Arc<Mutex<Vec<Property>>>,
}

impl InMemoryPropertyRepository {
    /// Current stored copy of a listing.
    pub fn get(&self, id: &PropertyId) -> Option<Property> {
        lock(&self.rows)
            .ok()
            .and_then(|rows| rows.iter().find(|row| row.id == *id).cloned())
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<Property>, PropertyRepositoryError> {
        yield_now().await;
        let rows = lock(&self.rows).map_err(PropertyRepositoryError::query)?;
        Ok(rows.iter().find(|row| row.short_code == *code).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &ProfileId,
    ) -> Result<Vec<Property>, PropertyRepositoryError> {
        yield_now().await;
        let rows = lock(&self.rows).map_err(PropertyRepositoryError::query)?;
        let mut owned: Vec<Property> = rows
            .iter()
            .filter(|row| row.owner_id == *owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert(&self, property: &Property) -> Result<(), PropertyRepositoryError> {
        yield_now().await;
        let mut rows = lock(&self.rows).map_err(PropertyRepositoryError::query)?;
        if rows.iter().any(|row| row.short_code == property.short_code) {
            return Err(PropertyRepositoryError::duplicate_short_code(
                property.short_code.to_string(),
            ));
        }
        if rows.iter().any(|row| row.id == property.id) {
            return Err(PropertyRepositoryError::query("duplicate property id"));
        }
        rows.push(property.clone());
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        id: &PropertyId,
        expected: PropertyStatus,
        next: PropertyStatus,
    ) -> Result<bool, PropertyRepositoryError> {
        yield_now().await;
        let mut rows = lock(&self.rows).map_err(PropertyRepositoryError::query)?;
        match rows
            .iter_mut()
            .find(|row| row.id == *id && row.status == expected)
        {
            Some(row) => {
                row.status = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Append-only audit log. Appends can be made to fail to exercise the
/// best-effort audit path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusTransitionRepository {
    rows: Arc<Mutex<Vec<StatusTransition>>>,
    fail_appends: Arc<AtomicBool>,
}

impl InMemoryStatusTransitionRepository {
    /// Make subsequent appends fail with a connection error.
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Every stored transition, in append order.
    pub fn all(&self) -> Vec<StatusTransition> {
        lock(&self.rows).map(|rows| rows.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StatusTransitionRepository for InMemoryStatusTransitionRepository {
    async fn append(
        &self,
        transition: &StatusTransition,
    ) -> Result<(), StatusTransitionRepositoryError> {
        yield_now().await;
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StatusTransitionRepositoryError::connection(
                "audit store unavailable",
            ));
        }
        let mut rows = lock(&self.rows).map_err(StatusTransitionRepositoryError::query)?;
        rows.push(transition.clone());
        Ok(())
    }

    async fn list_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<StatusTransition>, StatusTransitionRepositoryError> {
        yield_now().await;
        let rows = lock(&self.rows).map_err(StatusTransitionRepositoryError::query)?;
        Ok(rows
            .iter()
            .filter(|row| row.property_id == *property_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::{profile, property};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn compare_and_set_only_moves_from_expected_status() {
        let repo = InMemoryPropertyRepository::default();
        let owner = profile(Some("a"), "a@example.com");
        let listing = property(&owner, "KTR-482", PropertyStatus::Published);
        repo.insert(&listing).await.expect("seed");

        let won = repo
            .compare_and_set_status(&listing.id, PropertyStatus::Published, PropertyStatus::Inactive)
            .await
            .expect("cas");
        let lost = repo
            .compare_and_set_status(&listing.id, PropertyStatus::Published, PropertyStatus::Finalized)
            .await
            .expect("cas");

        assert!(won);
        assert!(!lost);
        assert_eq!(
            repo.get(&listing.id).map(|p| p.status),
            Some(PropertyStatus::Inactive)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn short_codes_are_unique() {
        let repo = InMemoryPropertyRepository::default();
        let owner = profile(Some("a"), "a@example.com");
        repo.insert(&property(&owner, "KTR-482", PropertyStatus::Pending))
            .await
            .expect("seed");

        let result = repo
            .insert(&property(&owner, "ktr482", PropertyStatus::Pending))
            .await;

        assert!(matches!(
            result,
            Err(PropertyRepositoryError::DuplicateShortCode { .. })
        ));
    }
}
