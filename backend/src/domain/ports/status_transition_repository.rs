//! Port for the append-only status audit log.

use async_trait::async_trait;

use crate::domain::{PropertyId, StatusTransition};

use super::define_port_error;

define_port_error! {
    /// Errors raised by status transition repository adapters.
    pub enum StatusTransitionRepositoryError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "status transition repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } => "status transition repository query failed: {message}",
    }
}

/// Append-only store of [`StatusTransition`] records.
///
/// Records are never updated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusTransitionRepository: Send + Sync {
    /// Append one transition record.
    async fn append(
        &self,
        transition: &StatusTransition,
    ) -> Result<(), StatusTransitionRepositoryError>;

    /// List a listing's transitions in the order they occurred.
    async fn list_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<StatusTransition>, StatusTransitionRepositoryError>;
}
