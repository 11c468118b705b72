//! Reqwest-backed identity provider adapter.
//!
//! Both credential channels carry a provider access token: the bearer header
//! directly, the ambient session as the token captured when the session was
//! established. Either is validated by asking the provider who it belongs to.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::ProviderUserDto;
use crate::domain::ports::{AuthProvider, AuthProviderError};
use crate::domain::{AmbientSession, BearerToken, ExternalIdentity};

const USER_PATH: &str = "auth/v1/user";

/// Identity provider adapter calling `GET {base}/auth/v1/user`.
pub struct HttpAuthProvider {
    client: Client,
    user_endpoint: Url,
    api_key: String,
}

impl HttpAuthProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot be joined or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AuthProviderError> {
        let user_endpoint = base_url
            .join(USER_PATH)
            .map_err(|err| AuthProviderError::invalid_response(format!("base url: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AuthProviderError::unavailable(err.to_string()))?;
        Ok(Self {
            client,
            user_endpoint,
            api_key: api_key.into(),
        })
    }

    async fn lookup(&self, access_token: &str) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        let response = self
            .client
            .get(self.user_endpoint.clone())
            .bearer_auth(access_token)
            .header("apikey", self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        classify_response(status, body.as_ref())
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn validate_bearer(
        &self,
        token: &BearerToken,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        self.lookup(token.expose()).await
    }

    async fn read_ambient_session(
        &self,
        session: &AmbientSession,
    ) -> Result<Option<ExternalIdentity>, AuthProviderError> {
        self.lookup(session.expose()).await
    }
}

fn classify_response(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<ExternalIdentity>, AuthProviderError> {
    match status {
        StatusCode::OK => parse_identity(body).map(Some),
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND => {
            debug!(status = status.as_u16(), "provider rejected credential");
            Ok(None)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Err(
            AuthProviderError::timeout(format!("status {}", status.as_u16())),
        ),
        _ => Err(AuthProviderError::unavailable(format!(
            "status {}",
            status.as_u16()
        ))),
    }
}

fn parse_identity(body: &[u8]) -> Result<ExternalIdentity, AuthProviderError> {
    let decoded: ProviderUserDto = serde_json::from_slice(body).map_err(|error| {
        AuthProviderError::invalid_response(format!("invalid user payload: {error}"))
    })?;
    decoded
        .into_identity()
        .map_err(AuthProviderError::invalid_response)
}

fn map_transport_error(error: reqwest::Error) -> AuthProviderError {
    if error.is_timeout() {
        AuthProviderError::timeout(error.to_string())
    } else {
        AuthProviderError::unavailable(error.to_string())
    }
}
