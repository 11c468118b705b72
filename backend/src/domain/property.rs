//! Property listing model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identifier::{ShortCode, build_slug};
use super::user_profile::ProfileId;

/// Maximum length of a listing title.
pub const PROPERTY_TITLE_MAX: usize = 140;

/// Validation errors raised by property value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    UnknownStatus,
}

impl fmt::Display for PropertyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::UnknownStatus => write!(
                f,
                "status must be one of pending, published, inactive, finalized"
            ),
        }
    }
}

impl std::error::Error for PropertyValidationError {}

/// Internal property key. Never exposed in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(Uuid);

impl PropertyId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listing title as entered by the owner, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyTitle(String);

impl PropertyTitle {
    /// Validate and construct a title.
    pub fn new(value: impl AsRef<str>) -> Result<Self, PropertyValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PropertyValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > PROPERTY_TITLE_MAX {
            return Err(PropertyValidationError::TitleTooLong {
                max: PROPERTY_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PropertyTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PropertyTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PropertyTitle> for String {
    fn from(value: PropertyTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for PropertyTitle {
    type Error = PropertyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Awaiting administrative review. Initial state.
    Pending,
    /// Visible to the public.
    Published,
    /// Hidden by the owner; can be republished.
    Inactive,
    /// Closed for good.
    Finalized,
}

impl PropertyStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Published,
        Self::Inactive,
        Self::Finalized,
    ];

    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Inactive => "inactive",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = PropertyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(PropertyValidationError::UnknownStatus)
    }
}

/// Property listing.
///
/// ## Invariants
/// - `short_code` is globally unique; enforced by the repository.
/// - Created `Pending` and owned exclusively by `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: PropertyId,
    pub short_code: ShortCode,
    pub owner_id: ProfileId,
    pub title: PropertyTitle,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// Build a freshly created, pending listing.
    pub fn new_pending(
        short_code: ShortCode,
        owner_id: ProfileId,
        title: PropertyTitle,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PropertyId::random(),
            short_code,
            owner_id,
            title,
            status: PropertyStatus::Pending,
            created_at,
        }
    }

    /// Share slug, derived on demand and never stored.
    pub fn slug(&self) -> String {
        build_slug(self.title.as_ref(), &self.short_code)
    }

    /// Prefix under which this listing's media objects live.
    pub fn media_prefix(&self) -> String {
        format!("properties/{}/", self.short_code.to_slug_suffix())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_text_round_trips() {
        for status in PropertyStatus::ALL {
            assert_eq!(status.as_str().parse::<PropertyStatus>(), Ok(status));
        }
        assert_eq!(
            "archived".parse::<PropertyStatus>(),
            Err(PropertyValidationError::UnknownStatus)
        );
    }

    #[rstest]
    #[case("   ", PropertyValidationError::EmptyTitle)]
    #[case("", PropertyValidationError::EmptyTitle)]
    fn rejects_blank_titles(#[case] raw: &str, #[case] expected: PropertyValidationError) {
        assert_eq!(PropertyTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn new_listings_are_pending_with_slug_and_media_prefix() {
        let code = ShortCode::parse("KTR-482").expect("code");
        let title = PropertyTitle::new(" Sunny Loft ").expect("title");
        let property = Property::new_pending(code, ProfileId::random(), title, Utc::now());

        assert_eq!(property.status, PropertyStatus::Pending);
        assert_eq!(property.title.as_ref(), "Sunny Loft");
        assert_eq!(property.slug(), "sunny-loft-ktr-482");
        assert_eq!(property.media_prefix(), "properties/ktr-482/");
    }
}
