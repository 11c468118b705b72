//! Application-owned user profile model.
//!
//! A profile is the internal record of a person, created on first
//! authenticated contact and linked to the identity provider's subject id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length accepted for an external subject identifier.
pub const EXTERNAL_ID_MAX: usize = 255;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a full name.
pub const FULL_NAME_MAX: usize = 120;
/// Maximum length of a stored locale tag.
pub const LOCALE_MAX: usize = 35;

/// Validation errors raised by profile value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProfileValidationError {
    EmptyExternalId,
    ExternalIdTooLong { max: usize },
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyFullName,
    FullNameTooLong { max: usize },
    UnknownRole,
}

impl fmt::Display for UserProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExternalId => write!(f, "external id must not be empty"),
            Self::ExternalIdTooLong { max } => {
                write!(f, "external id must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain a local part and a domain"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
            Self::UnknownRole => write!(f, "role must be one of owner, agent, agency"),
        }
    }
}

impl std::error::Error for UserProfileValidationError {}

/// Internal profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
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

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subject identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

impl ExternalId {
    /// Validate and construct an external id.
    pub fn new(value: impl Into<String>) -> Result<Self, UserProfileValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserProfileValidationError::EmptyExternalId);
        }
        if trimmed.chars().count() > EXTERNAL_ID_MAX {
            return Err(UserProfileValidationError::ExternalIdTooLong {
                max: EXTERNAL_ID_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ExternalId> for String {
    fn from(value: ExternalId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ExternalId {
    type Error = UserProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - Trimmed and lowercased so that uniqueness checks are case-insensitive.
/// - Exactly one `@` with non-empty text on both sides.
///
/// # Examples
/// ```
/// use listings::domain::Email;
///
/// let email = Email::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert_eq!(email.local_part(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserProfileValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserProfileValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserProfileValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let valid = normalised
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !normalised.contains(char::is_whitespace)
            });
        if !valid {
            return Err(UserProfileValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Text before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name stored on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a full name; surrounding whitespace is dropped.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserProfileValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserProfileValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > FULL_NAME_MAX {
            return Err(UserProfileValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Fallback name derived from an email address.
    pub fn from_email(email: &Email) -> Self {
        let local: String = email.local_part().chars().take(FULL_NAME_MAX).collect();
        Self(local)
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role of a profile on the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    #[default]
    Owner,
    Agent,
    Agency,
}

impl ProfileRole {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Agent => "agent",
            Self::Agency => "agency",
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileRole {
    type Err = UserProfileValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "agent" => Ok(Self::Agent),
            "agency" => Ok(Self::Agency),
            _ => Err(UserProfileValidationError::UnknownRole),
        }
    }
}

/// Application user profile.
///
/// ## Invariants
/// - At most one profile per `external_id` and per `email`; enforced by the
///   repository.
/// - `external_id` is `None` only until the first linking contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: ProfileId,
    pub external_id: Option<ExternalId>,
    pub email: Email,
    pub full_name: FullName,
    pub role: ProfileRole,
    pub is_active: bool,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Whether this profile is linked to the given provider subject.
    pub fn is_linked_to(&self, external_id: &ExternalId) -> bool {
        self.external_id.as_ref() == Some(external_id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserProfileValidationError::EmptyEmail)]
    #[case("   ", UserProfileValidationError::EmptyEmail)]
    #[case("no-at-sign", UserProfileValidationError::InvalidEmail)]
    #[case("@example.com", UserProfileValidationError::InvalidEmail)]
    #[case("ada@", UserProfileValidationError::InvalidEmail)]
    #[case("a@b@c", UserProfileValidationError::InvalidEmail)]
    #[case("ada lovelace@example.com", UserProfileValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] raw: &str, #[case] expected: UserProfileValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn full_name_falls_back_to_email_local_part() {
        let email = Email::new("grace.hopper@example.com").expect("valid email");
        assert_eq!(FullName::from_email(&email).as_ref(), "grace.hopper");
    }

    #[rstest]
    fn full_name_rejects_overlong_values() {
        let raw = "x".repeat(FULL_NAME_MAX + 1);
        assert_eq!(
            FullName::new(raw),
            Err(UserProfileValidationError::FullNameTooLong { max: FULL_NAME_MAX })
        );
    }

    #[rstest]
    #[case("owner", ProfileRole::Owner)]
    #[case("agent", ProfileRole::Agent)]
    #[case("agency", ProfileRole::Agency)]
    fn role_round_trips_through_storage_text(#[case] raw: &str, #[case] role: ProfileRole) {
        assert_eq!(raw.parse::<ProfileRole>(), Ok(role));
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn external_id_is_trimmed() {
        let id = ExternalId::new("  sub-123 ").expect("valid id");
        assert_eq!(id.as_ref(), "sub-123");
        assert_eq!(
            ExternalId::new(" "),
            Err(UserProfileValidationError::EmptyExternalId)
        );
    }
}
