//! DTOs for decoding the provider's user payload.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{Email, ExternalId, ExternalIdentity};

#[derive(Debug, Deserialize)]
pub(super) struct ProviderUserDto {
    pub(super) id: String,
    pub(super) email: Option<String>,
    pub(super) email_confirmed_at: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: Map<String, Value>,
}

impl ProviderUserDto {
    pub(super) fn into_identity(self) -> Result<ExternalIdentity, String> {
        let external_id = ExternalId::new(self.id).map_err(|err| format!("user id: {err}"))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| "user has no email address".to_owned())
            .and_then(|raw| Email::new(raw).map_err(|err| format!("user email: {err}")))?;
        let mut identity = ExternalIdentity::new(external_id, email);
        identity.email_verified = self.email_confirmed_at.is_some();
        identity.metadata = self.user_metadata;
        Ok(identity)
    }
}
