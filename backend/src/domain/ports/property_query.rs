//! Driving port for owner-scoped listing reads.

use async_trait::async_trait;

use crate::domain::{Error, Property, StatusTransition, UserProfile};

/// Domain use-case port for reading an owner's listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyQuery: Send + Sync {
    /// Load one listing by untrusted identifier (short code, slug or legacy id).
    async fn get(&self, caller: &UserProfile, identifier: &str) -> Result<Property, Error>;

    /// List the caller's listings, newest first.
    async fn list(&self, caller: &UserProfile) -> Result<Vec<Property>, Error>;

    /// Return a listing's status audit trail in the order it happened.
    async fn history(
        &self,
        caller: &UserProfile,
        identifier: &str,
    ) -> Result<Vec<StatusTransition>, Error>;
}
