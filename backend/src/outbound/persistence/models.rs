//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every column and report corrupt rows as strings.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Email, ExternalId, FullName, ProfileId, ProfileRole, Property, PropertyId, PropertyStatus,
    PropertyTitle, ShortCode, StatusTransition, UserProfile,
};

use super::schema::{properties, property_status_transitions, user_profiles};

// ---------------------------------------------------------------------------
// User profiles
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub id: Uuid,
    pub external_id: Option<String>,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating profile records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub(crate) struct NewUserProfileRow<'a> {
    pub id: Uuid,
    pub external_id: Option<&'a str>,
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
    pub is_active: bool,
    pub avatar_url: Option<&'a str>,
    pub locale: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a UserProfile> for NewUserProfileRow<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            id: *profile.id.as_uuid(),
            external_id: profile.external_id.as_ref().map(AsRef::as_ref),
            email: profile.email.as_ref(),
            full_name: profile.full_name.as_ref(),
            role: profile.role.as_str(),
            is_active: profile.is_active,
            avatar_url: profile.avatar_url.as_deref(),
            locale: profile.locale.as_deref(),
            created_at: profile.created_at,
        }
    }
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = String;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        let external_id = row
            .external_id
            .map(ExternalId::new)
            .transpose()
            .map_err(|err| format!("user_profiles.external_id: {err}"))?;
        let email = Email::new(&row.email).map_err(|err| format!("user_profiles.email: {err}"))?;
        let full_name =
            FullName::new(&row.full_name).map_err(|err| format!("user_profiles.full_name: {err}"))?;
        let role = row
            .role
            .parse::<ProfileRole>()
            .map_err(|err| format!("user_profiles.role: {err}"))?;
        Ok(Self {
            id: ProfileId::from_uuid(row.id),
            external_id,
            email,
            full_name,
            role,
            is_active: row.is_active,
            avatar_url: row.avatar_url,
            locale: row.locale,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Row struct for reading from the properties table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PropertyRow {
    pub id: Uuid,
    pub short_code: String,
    pub owner_id: Uuid,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating listing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = properties)]
pub(crate) struct NewPropertyRow<'a> {
    pub id: Uuid,
    pub short_code: &'a str,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Property> for NewPropertyRow<'a> {
    fn from(property: &'a Property) -> Self {
        Self {
            id: *property.id.as_uuid(),
            short_code: property.short_code.as_ref(),
            owner_id: *property.owner_id.as_uuid(),
            title: property.title.as_ref(),
            status: property.status.as_str(),
            created_at: property.created_at,
        }
    }
}

impl TryFrom<PropertyRow> for Property {
    type Error = String;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let short_code = ShortCode::parse(&row.short_code)
            .map_err(|err| format!("properties.short_code: {err}"))?;
        let title =
            PropertyTitle::new(&row.title).map_err(|err| format!("properties.title: {err}"))?;
        let status = row
            .status
            .parse::<PropertyStatus>()
            .map_err(|err| format!("properties.status: {err}"))?;
        Ok(Self {
            id: PropertyId::from_uuid(row.id),
            short_code,
            owner_id: ProfileId::from_uuid(row.owner_id),
            title,
            status,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Row struct for reading from the property_status_transitions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = property_status_transitions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StatusTransitionRow {
    #[expect(dead_code, reason = "surrogate key only used for ordering")]
    pub id: i64,
    pub property_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_id: Uuid,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Insertable struct for appending audit records; `id` is assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = property_status_transitions)]
pub(crate) struct NewStatusTransitionRow<'a> {
    pub property_id: Uuid,
    pub from_status: Option<&'a str>,
    pub to_status: &'a str,
    pub actor_id: Uuid,
    pub reason: &'a str,
    pub occurred_at: DateTime<Utc>,
}

impl<'a> From<&'a StatusTransition> for NewStatusTransitionRow<'a> {
    fn from(transition: &'a StatusTransition) -> Self {
        Self {
            property_id: *transition.property_id.as_uuid(),
            from_status: transition.from_status.map(PropertyStatus::as_str),
            to_status: transition.to_status.as_str(),
            actor_id: *transition.actor_id.as_uuid(),
            reason: transition.reason.as_str(),
            occurred_at: transition.occurred_at,
        }
    }
}

impl TryFrom<StatusTransitionRow> for StatusTransition {
    type Error = String;

    fn try_from(row: StatusTransitionRow) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            raw.parse::<PropertyStatus>()
                .map_err(|err| format!("property_status_transitions status: {err}"))
        };
        Ok(Self {
            property_id: PropertyId::from_uuid(row.property_id),
            from_status: row.from_status.as_deref().map(parse).transpose()?,
            to_status: parse(&row.to_status)?,
            actor_id: ProfileId::from_uuid(row.actor_id),
            reason: row.reason,
            occurred_at: row.occurred_at,
        })
    }
}
