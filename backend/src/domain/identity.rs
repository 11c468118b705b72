//! External identities and the raw credentials a request may carry.
//!
//! Keep inbound header and cookie parsing outside the domain: adapters build
//! [`RequestCredentials`] and the principal resolver decides what they mean.

use std::fmt;

use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::user_profile::{Email, ExternalId, FullName, LOCALE_MAX};

/// Principal asserted by the identity provider. Read-only input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIdentity {
    pub external_id: ExternalId,
    pub email: Email,
    pub email_verified: bool,
    pub metadata: Map<String, Value>,
}

impl ExternalIdentity {
    /// Build an identity without metadata.
    pub fn new(external_id: ExternalId, email: Email) -> Self {
        Self {
            external_id,
            email,
            email_verified: false,
            metadata: Map::new(),
        }
    }

    fn metadata_text(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Display name from `full_name`, then `name`, then the email local part.
    ///
    /// # Examples
    /// ```
    /// use listings::domain::{Email, ExternalId, ExternalIdentity};
    /// use serde_json::json;
    ///
    /// let mut identity = ExternalIdentity::new(
    ///     ExternalId::new("sub-1").expect("id"),
    ///     Email::new("ada@example.com").expect("email"),
    /// );
    /// assert_eq!(identity.display_name().as_ref(), "ada");
    ///
    /// identity.metadata.insert("name".into(), json!("Ada Lovelace"));
    /// assert_eq!(identity.display_name().as_ref(), "Ada Lovelace");
    /// ```
    pub fn display_name(&self) -> FullName {
        ["full_name", "name"]
            .into_iter()
            .filter_map(|key| self.metadata_text(key))
            .find_map(|raw| FullName::new(raw).ok())
            .unwrap_or_else(|| FullName::from_email(&self.email))
    }

    /// Avatar URL from `avatar_url`, then `picture`.
    pub fn avatar_url(&self) -> Option<String> {
        self.metadata_text("avatar_url")
            .or_else(|| self.metadata_text("picture"))
            .map(str::to_owned)
    }

    /// Preferred locale, if the provider supplied a plausible language tag.
    ///
    /// Tags longer than [`LOCALE_MAX`] or containing anything besides ASCII
    /// letters, digits, `-` and `_` are dropped rather than stored.
    ///
    /// # Examples
    /// ```
    /// use listings::domain::{Email, ExternalId, ExternalIdentity};
    /// use serde_json::json;
    ///
    /// let mut identity = ExternalIdentity::new(
    ///     ExternalId::new("sub-1").expect("id"),
    ///     Email::new("ada@example.com").expect("email"),
    /// );
    /// identity.metadata.insert("locale".into(), json!("en-GB"));
    /// assert_eq!(identity.locale().as_deref(), Some("en-GB"));
    ///
    /// identity.metadata.insert("locale".into(), json!("x".repeat(36)));
    /// assert_eq!(identity.locale(), None);
    /// ```
    pub fn locale(&self) -> Option<String> {
        self.metadata_text("locale")
            .filter(|tag| tag.len() <= LOCALE_MAX)
            .filter(|tag| {
                tag.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            })
            .map(str::to_owned)
    }
}

/// Opaque bearer credential presented in the `Authorization` header.
///
/// The secret is wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap a raw token; blank values are rejected.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// # Examples
    /// ```
    /// use listings::domain::BearerToken;
    ///
    /// let token = BearerToken::from_authorization_header("Bearer abc").expect("token");
    /// assert_eq!(token.expose(), "abc");
    /// assert!(BearerToken::from_authorization_header("Basic abc").is_none());
    /// ```
    pub fn from_authorization_header(header: &str) -> Option<Self> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Self::new(token)
    }

    /// Reveal the secret for transmission to the provider.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Provider session token carried by the ambient cookie session.
#[derive(Clone, PartialEq, Eq)]
pub struct AmbientSession(Zeroizing<String>);

impl AmbientSession {
    /// Wrap a stored session token; blank values are rejected.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Reveal the token for transmission to the provider.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AmbientSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AmbientSession(<redacted>)")
    }
}

/// Every credential channel a request might carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCredentials {
    pub bearer: Option<BearerToken>,
    pub ambient_session: Option<AmbientSession>,
}

impl RequestCredentials {
    /// Credentials carrying only a bearer token.
    pub fn bearer(token: BearerToken) -> Self {
        Self {
            bearer: Some(token),
            ambient_session: None,
        }
    }

    /// Credentials carrying only an ambient session.
    pub fn ambient(session: AmbientSession) -> Self {
        Self {
            bearer: None,
            ambient_session: Some(session),
        }
    }

    /// Whether no channel carries anything at all.
    pub fn is_empty(&self) -> bool {
        self.bearer.is_none() && self.ambient_session.is_none()
    }
}
