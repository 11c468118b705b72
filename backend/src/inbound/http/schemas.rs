//! OpenAPI schemas and wire DTOs for the HTTP adapter.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema` or
//! `Serialize`. Error schemas are registered against the domain types with
//! `#[schema(as = ...)]`; listing and profile payloads are adapter-owned
//! DTOs built from domain values.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Property, StatusTransition, StoredMedia, UserProfile};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request content fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No credential channel yielded an identity.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The owner asked for a change the lifecycle does not allow.
    #[schema(rename = "policy_violation")]
    PolicyViolation,
    /// The resource does not exist or belongs to someone else.
    #[schema(rename = "not_found")]
    NotFound,
    /// A concurrent request changed the resource first.
    #[schema(rename = "conflict")]
    Conflict,
    /// The identifier uses a retired format.
    #[schema(rename = "gone")]
    Gone,
    /// A dependency is unavailable; retry later.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "listing not found")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details; policy violations carry `details.code`.
    details: Option<serde_json::Value>,
}

/// Caller profile returned by `GET /api/v1/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "owner")]
    pub role: String,
    pub is_active: bool,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email.into(),
            full_name: profile.full_name.into(),
            role: profile.role.as_str().to_owned(),
            is_active: profile.is_active,
            avatar_url: profile.avatar_url,
            locale: profile.locale,
            created_at: profile.created_at,
        }
    }
}

/// Listing representation shared by every property endpoint.
///
/// The internal row id is never exposed; clients address listings by short
/// code or slug.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    #[schema(example = "KTR-482")]
    pub short_code: String,
    #[schema(example = "sunny-loft-near-the-park-ktr-482")]
    pub slug: String,
    #[schema(example = "Sunny loft near the park")]
    pub title: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&Property> for PropertyResponse {
    fn from(property: &Property) -> Self {
        Self {
            short_code: property.short_code.to_string(),
            slug: property.slug(),
            title: property.title.to_string(),
            status: property.status.as_str().to_owned(),
            created_at: property.created_at,
        }
    }
}

/// Listing plus whether the accompanying audit row was written.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMutationResponse {
    #[serde(flatten)]
    pub property: PropertyResponse,
    /// `false` when the change stuck but its audit record could not be saved.
    pub audit_recorded: bool,
}

/// One row of a listing's status history.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransitionResponse {
    /// Absent for the creation record.
    #[schema(example = "published")]
    pub from_status: Option<String>,
    #[schema(example = "inactive")]
    pub to_status: String,
    #[schema(example = "Owner deactivated")]
    pub reason: String,
    #[schema(value_type = String, format = DateTime)]
    pub occurred_at: DateTime<Utc>,
}

impl From<&StatusTransition> for StatusTransitionResponse {
    fn from(transition: &StatusTransition) -> Self {
        Self {
            from_status: transition
                .from_status
                .map(|status| status.as_str().to_owned()),
            to_status: transition.to_status.as_str().to_owned(),
            reason: transition.reason.clone(),
            occurred_at: transition.occurred_at,
        }
    }
}

/// Stored media object.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    #[schema(example = "properties/ktr-482/5f0c8d7e.jpg")]
    pub path: String,
    #[schema(example = "https://cdn.example.com/media/properties/ktr-482/5f0c8d7e.jpg")]
    pub public_url: String,
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    pub size_bytes: usize,
}

impl From<StoredMedia> for MediaResponse {
    fn from(media: StoredMedia) -> Self {
        Self {
            path: media.path.into(),
            public_url: media.public_url,
            content_type: media.content_type.mime().to_owned(),
            size_bytes: media.size_bytes,
        }
    }
}
