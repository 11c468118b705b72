//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed listing and identity types plus the
//! services that resolve principals, provision profiles, guard ownership and
//! drive the listing lifecycle. Infrastructure is reached only through
//! [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - ShortCode, IncomingIdentifier: listing identifier codec.
//! - UserProfile, Property, StatusTransition: persisted aggregates.
//! - AuthenticationService, PropertyService, MediaService: port
//!   implementations wired by the server.

pub mod error;
pub mod identifier;
pub mod identity;
pub mod media;
pub mod ports;
pub mod property;
pub mod trace_id;
pub mod user_profile;

mod authentication_service;
mod media_service;
mod ownership;
mod port_error_mapping;
mod principal;
mod property_service;
mod provisioning;
mod status_lifecycle;

pub use self::authentication_service::AuthenticationService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identifier::{
    IncomingIdentifier, LEGACY_ID_LEN, LegacyId, ParseShortCodeError, SLUG_TITLE_MAX, ShortCode,
    build_slug, generate_short_code, resolve_incoming,
};
pub use self::identity::{AmbientSession, BearerToken, ExternalIdentity, RequestCredentials};
pub use self::media::{
    MAX_MEDIA_BYTES, MAX_MEDIA_DELETE_BATCH, MediaContentType, MediaPath, MediaPathError,
    StoredMedia,
};
pub use self::media_service::MediaService;
pub use self::ownership::{Authorization, OwnershipGuard, authorize};
pub use self::principal::{
    AmbientSessionPrincipalSource, BearerPrincipalSource, CredentialChannel, PrincipalResolution,
    PrincipalResolver, PrincipalSource,
};
pub use self::property::{
    PROPERTY_TITLE_MAX, Property, PropertyId, PropertyStatus, PropertyTitle,
    PropertyValidationError,
};
pub use self::property_service::{
    MAX_SHORT_CODE_ATTEMPTS, PropertyService, RandomShortCodes, ShortCodeSource,
};
pub use self::provisioning::UserProvisioner;
pub use self::status_lifecycle::{
    StatusLifecycleEngine, StatusTransition, TRANSITION_REASON_MAX, TransitionInitiator,
    TransitionOutcome, TransitionPolicyError, TransitionReason, check_owner_transition,
    is_allowed,
};
pub use self::trace_id::TraceId;
pub use self::user_profile::{
    Email, ExternalId, FullName, LOCALE_MAX, ProfileId, ProfileRole, UserProfile,
    UserProfileValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use listings::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such listing"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
