//! Translation of driven-port errors into domain errors.
//!
//! Connectivity problems and timeouts become retryable
//! `service_unavailable` errors; anything else is an internal error. The full
//! adapter message is logged here and the caller only sees a generic message.

use tracing::error;

use super::Error;
use super::ports::{
    AuthProviderError, MediaStoreError, PropertyRepositoryError, StatusTransitionRepositoryError,
    UserProfileRepositoryError,
};

const RETRY_MESSAGE: &str = "a dependency is temporarily unavailable; please retry";

pub(crate) fn map_auth_provider_error(err: AuthProviderError) -> Error {
    error!(error = %err, "identity provider call failed");
    Error::service_unavailable(RETRY_MESSAGE)
}

pub(crate) fn map_profile_error(err: UserProfileRepositoryError) -> Error {
    error!(error = %err, "user profile repository call failed");
    match err {
        UserProfileRepositoryError::Connection { .. } => Error::service_unavailable(RETRY_MESSAGE),
        UserProfileRepositoryError::Query { .. } | UserProfileRepositoryError::Duplicate { .. } => {
            Error::internal("user profile repository error")
        }
    }
}

pub(crate) fn map_property_error(err: PropertyRepositoryError) -> Error {
    error!(error = %err, "property repository call failed");
    match err {
        PropertyRepositoryError::Connection { .. } => Error::service_unavailable(RETRY_MESSAGE),
        PropertyRepositoryError::Query { .. }
        | PropertyRepositoryError::DuplicateShortCode { .. } => {
            Error::internal("property repository error")
        }
    }
}

pub(crate) fn map_transition_error(err: StatusTransitionRepositoryError) -> Error {
    error!(error = %err, "status transition repository call failed");
    match err {
        StatusTransitionRepositoryError::Connection { .. } => {
            Error::service_unavailable(RETRY_MESSAGE)
        }
        StatusTransitionRepositoryError::Query { .. } => {
            Error::internal("status transition repository error")
        }
    }
}

pub(crate) fn map_media_error(err: MediaStoreError) -> Error {
    error!(error = %err, "media store call failed");
    match err {
        MediaStoreError::Unavailable { .. } | MediaStoreError::Timeout { .. } => {
            Error::service_unavailable(RETRY_MESSAGE)
        }
        MediaStoreError::Rejected { .. } => Error::internal("media store error"),
    }
}
