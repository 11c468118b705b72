//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use listings::outbound::media::MediaStoreEndpoint;
use listings::outbound::persistence::DbPool;
use url::Url;

/// Identity provider location and credentials.
#[derive(Debug, Clone)]
pub struct AuthProviderEndpoint {
    pub base_url: Url,
    pub api_key: String,
}

/// Builder-style configuration for creating the HTTP server.
///
/// Every outbound dependency is optional; an absent one is replaced by its
/// in-memory counterpart.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) timeout: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) auth_provider: Option<AuthProviderEndpoint>,
    pub(crate) media_store: Option<MediaStoreEndpoint>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            timeout: Duration::from_secs(5),
            db_pool: None,
            auth_provider: None,
            media_store: None,
        }
    }

    /// Deadline applied to identity provider and media store calls.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_auth_provider(mut self, endpoint: Option<AuthProviderEndpoint>) -> Self {
        self.auth_provider = endpoint;
        self
    }

    #[must_use]
    pub fn with_media_store(mut self, endpoint: Option<MediaStoreEndpoint>) -> Self {
        self.media_store = endpoint;
        self
    }
}
