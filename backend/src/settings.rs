//! Service settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file or a
//! `LISTINGS_`-prefixed environment variable. Absent infrastructure URLs
//! select the in-memory adapters so the service runs standalone.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::media::MediaStoreEndpoint;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Problems found while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid URL in {field}: {message}")]
    Url { field: &'static str, message: String },
    #[error("{field} is required when {because} is set")]
    Missing {
        field: &'static str,
        because: &'static str,
    },
}

/// Runtime settings for the listings service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LISTINGS")]
pub struct ServiceSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; omit to use in-memory repositories.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Timeout applied to database queries and outbound HTTP calls.
    pub timeout_ms: Option<u64>,
    /// Identity provider base URL; omit to use the fixture provider.
    pub auth_provider_url: Option<String>,
    /// API key sent to the identity provider.
    pub auth_provider_api_key: Option<String>,
    /// Object store base URL; omit to keep media in memory.
    pub media_store_url: Option<String>,
    pub media_bucket: Option<String>,
    /// Base URL under which stored objects are publicly served.
    pub media_public_url: Option<String>,
    pub media_service_key: Option<String>,
}

impl ServiceSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Deadline for any single external call.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// Provider base URL and API key, when a real provider is configured.
    pub fn auth_provider(&self) -> Result<Option<(Url, String)>, SettingsError> {
        let Some(raw) = self.auth_provider_url.as_deref() else {
            return Ok(None);
        };
        let url = parse_url("auth_provider_url", raw)?;
        let api_key = self
            .auth_provider_api_key
            .clone()
            .ok_or(SettingsError::Missing {
                field: "auth_provider_api_key",
                because: "auth_provider_url",
            })?;
        Ok(Some((url, api_key)))
    }

    /// Object store endpoint, when a real store is configured.
    pub fn media_store(&self) -> Result<Option<MediaStoreEndpoint>, SettingsError> {
        let Some(raw) = self.media_store_url.as_deref() else {
            return Ok(None);
        };
        let base_url = parse_url("media_store_url", raw)?;
        let require = |value: &Option<String>, field: &'static str| {
            value.clone().ok_or(SettingsError::Missing {
                field,
                because: "media_store_url",
            })
        };
        let bucket = require(&self.media_bucket, "media_bucket")?;
        let service_key = require(&self.media_service_key, "media_service_key")?;
        let public_base_url = parse_url(
            "media_public_url",
            &require(&self.media_public_url, "media_public_url")?,
        )?;
        Ok(Some(MediaStoreEndpoint {
            base_url,
            bucket,
            public_base_url,
            service_key,
        }))
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|err| SettingsError::Url {
        field,
        message: err.to_string(),
    })
}
