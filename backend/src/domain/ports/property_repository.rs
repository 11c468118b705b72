//! Port for property listing persistence.
//!
//! Status changes go through [`PropertyRepository::compare_and_set_status`]
//! so that two racing requests cannot both move a listing away from the same
//! starting status.

use async_trait::async_trait;

use crate::domain::{ProfileId, Property, PropertyId, PropertyStatus, ShortCode};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by property repository adapters.
    pub enum PropertyRepositoryError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "property repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "property repository query failed: {message}",
        /// The generated short code is already taken.
        DuplicateShortCode { short_code: String } =>
            "short code {short_code} is already in use",
    }
}

/// Port for storing and looking up listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Fetch a listing by its canonical short code.
    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<Property>, PropertyRepositoryError>;

    /// List an owner's listings, newest first.
    async fn list_by_owner(
        &self,
        owner_id: &ProfileId,
    ) -> Result<Vec<Property>, PropertyRepositoryError>;

    /// Insert a new listing.
    ///
    /// Fails with [`PropertyRepositoryError::DuplicateShortCode`] when the
    /// short code collides with an existing listing.
    async fn insert(&self, property: &Property) -> Result<(), PropertyRepositoryError>;

    /// Move a listing from `expected` to `next`.
    ///
    /// Returns `false` without writing when the stored status no longer equals
    /// `expected`.
    async fn compare_and_set_status(
        &self,
        id: &PropertyId,
        expected: PropertyStatus,
        next: PropertyStatus,
    ) -> Result<bool, PropertyRepositoryError>;
}
