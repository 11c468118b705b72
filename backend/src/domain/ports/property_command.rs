//! Driving port for listing mutations.

use async_trait::async_trait;

use crate::domain::{Error, Property, PropertyStatus, TransitionOutcome, UserProfile};

/// Request to create a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePropertyRequest {
    /// Raw title; validated by the service.
    pub title: String,
}

/// Result of creating a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProperty {
    pub property: Property,
    /// Whether the creation audit record was written.
    pub audit_recorded: bool,
}

/// Request to move a listing to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    pub target: PropertyStatus,
    /// Optional free-text reason recorded in the audit trail.
    pub reason: Option<String>,
}

/// Domain use-case port for creating and updating listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyCommand: Send + Sync {
    /// Create a pending listing owned by `caller`.
    async fn create(
        &self,
        caller: &UserProfile,
        request: CreatePropertyRequest,
    ) -> Result<CreatedProperty, Error>;

    /// Apply an owner-initiated status change.
    async fn change_status(
        &self,
        caller: &UserProfile,
        identifier: &str,
        request: ChangeStatusRequest,
    ) -> Result<TransitionOutcome, Error>;
}
