//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AuthProvider`, repositories, `MediaStore`) describe what
//! the domain needs from infrastructure. Driving ports
//! (`PrincipalAuthenticator`, `PropertyQuery`, `PropertyCommand`,
//! `PropertyMediaCommand`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_provider;
mod media_store;
mod principal_authenticator;
mod property_command;
mod property_media_command;
mod property_query;
mod property_repository;
mod status_transition_repository;
mod user_profile_repository;

#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use auth_provider::{AuthProvider, AuthProviderError, FixtureAuthProvider};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError};
#[cfg(test)]
pub use principal_authenticator::MockPrincipalAuthenticator;
pub use principal_authenticator::PrincipalAuthenticator;
#[cfg(test)]
pub use property_command::MockPropertyCommand;
pub use property_command::{
    ChangeStatusRequest, CreatePropertyRequest, CreatedProperty, PropertyCommand,
};
#[cfg(test)]
pub use property_media_command::MockPropertyMediaCommand;
pub use property_media_command::{MediaUploadRequest, PropertyMediaCommand};
#[cfg(test)]
pub use property_query::MockPropertyQuery;
pub use property_query::PropertyQuery;
#[cfg(test)]
pub use property_repository::MockPropertyRepository;
pub use property_repository::{PropertyRepository, PropertyRepositoryError};
#[cfg(test)]
pub use status_transition_repository::MockStatusTransitionRepository;
pub use status_transition_repository::{
    StatusTransitionRepository, StatusTransitionRepositoryError,
};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{UserProfileRepository, UserProfileRepositoryError};
