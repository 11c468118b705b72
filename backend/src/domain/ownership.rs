//! Ownership guard.
//!
//! Every operation taking a property identifier goes through
//! [`OwnershipGuard::load_owned`]: the identifier is classified, the listing
//! loaded and ownership confirmed. A listing owned by someone else produces
//! exactly the same error as a listing that does not exist; only the logs
//! tell them apart.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::port_error_mapping::map_property_error;
use super::ports::PropertyRepository;
use super::{Error, IncomingIdentifier, Property, UserProfile, resolve_incoming};

const NOT_FOUND_MESSAGE: &str = "listing not found";
const GONE_MESSAGE: &str =
    "this listing link uses a retired identifier format; re-fetch the current listing path";

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Forbidden,
    NotFound,
}

/// Pure ownership decision.
///
/// # Examples
/// ```
/// use listings::domain::{Authorization, authorize};
/// # use listings::domain::{Email, FullName, ProfileId, ProfileRole, UserProfile};
/// # let email = Email::new("a@example.com").expect("email");
/// # let profile = UserProfile {
/// #     id: ProfileId::random(), external_id: None, full_name: FullName::from_email(&email),
/// #     email, role: ProfileRole::Owner, is_active: true, avatar_url: None, locale: None,
/// #     created_at: chrono::Utc::now(),
/// # };
/// assert_eq!(authorize(&profile, None), Authorization::NotFound);
/// ```
pub fn authorize(profile: &UserProfile, property: Option<&Property>) -> Authorization {
    match property {
        None => Authorization::NotFound,
        Some(property) if property.owner_id == profile.id => Authorization::Authorized,
        Some(_) => Authorization::Forbidden,
    }
}

/// Loads listings by untrusted identifier and enforces ownership.
pub struct OwnershipGuard<P> {
    properties: Arc<P>,
}

impl<P> Clone for OwnershipGuard<P> {
    fn clone(&self) -> Self {
        Self {
            properties: Arc::clone(&self.properties),
        }
    }
}

impl<P> OwnershipGuard<P> {
    pub fn new(properties: Arc<P>) -> Self {
        Self { properties }
    }
}

impl<P> OwnershipGuard<P>
where
    P: PropertyRepository,
{
    /// Resolve `raw` and return the listing if `profile` owns it.
    ///
    /// Unrecognised identifiers, missing listings and listings owned by
    /// someone else all yield the same not-found error. Legacy identifiers
    /// yield a gone error.
    pub async fn load_owned(&self, profile: &UserProfile, raw: &str) -> Result<Property, Error> {
        let code = match resolve_incoming(raw) {
            IncomingIdentifier::ShortCode(code) => code,
            IncomingIdentifier::Legacy(legacy) => {
                info!(caller_id = %profile.id, legacy_id = %legacy, "legacy identifier presented");
                return Err(Error::gone(GONE_MESSAGE).with_details(json!({
                    "code": "legacy_identifier",
                })));
            }
            IncomingIdentifier::Unrecognized => return Err(Error::not_found(NOT_FOUND_MESSAGE)),
        };

        let property = self
            .properties
            .find_by_short_code(&code)
            .await
            .map_err(map_property_error)?;

        match authorize(profile, property.as_ref()) {
            Authorization::Authorized => property.ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE)),
            Authorization::Forbidden => {
                info!(
                    caller_id = %profile.id,
                    owner_id = ?property.as_ref().map(|p| p.owner_id.to_string()),
                    short_code = %code,
                    "ownership check denied access"
                );
                Err(Error::not_found(NOT_FOUND_MESSAGE))
            }
            Authorization::NotFound => Err(Error::not_found(NOT_FOUND_MESSAGE)),
        }
    }
}
