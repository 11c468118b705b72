//! Port abstraction for user profile persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Email, ExternalId, ProfileId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "user profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user profile repository query failed: {message}",
        /// A unique constraint on external id or email rejected the insert.
        Duplicate { constraint: String } => "user profile already exists ({constraint})",
    }
}

/// Port for storing and looking up application profiles.
///
/// Adapters must enforce uniqueness of both `external_id` and `email` and
/// report violations as [`UserProfileRepositoryError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Fetch a profile by internal identifier.
    async fn find_by_id(
        &self,
        id: &ProfileId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Fetch the profile linked to a provider subject.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Fetch a profile by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Insert a new profile.
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError>;

    /// Link `external_id` onto a profile whose external id is still unset.
    ///
    /// Returns the updated profile, or `None` when the profile is missing or
    /// was linked in the meantime.
    async fn link_external_id(
        &self,
        id: &ProfileId,
        external_id: &ExternalId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;
}
