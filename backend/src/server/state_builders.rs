//! Builders for HTTP state ports.
//!
//! Each outbound dependency is selected independently: the Diesel
//! repositories when a pool is configured, the HTTP identity provider and
//! media store when their endpoints are configured, and in-memory adapters
//! otherwise.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use listings::domain::ports::{
    AuthProvider, FixtureAuthProvider, PrincipalAuthenticator, PropertyCommand,
    PropertyMediaCommand, PropertyQuery, PropertyRepository, StatusTransitionRepository,
    UserProfileRepository,
};
use listings::domain::{
    AuthenticationService, MediaService, PrincipalResolver, PropertyService, UserProvisioner,
};
use listings::inbound::http::state::{HttpState, HttpStatePorts};
use listings::outbound::auth_provider::HttpAuthProvider;
use listings::outbound::media::{HttpMediaStore, MediaStoreEndpoint};
use listings::outbound::memory::{
    InMemoryMediaStore, InMemoryPropertyRepository, InMemoryStatusTransitionRepository,
    InMemoryUserProfileRepository,
};
use listings::outbound::persistence::{
    DieselPropertyRepository, DieselStatusTransitionRepository, DieselUserProfileRepository,
};

use super::ServerConfig;
use super::config::AuthProviderEndpoint;

fn build_auth_provider(
    endpoint: Option<&AuthProviderEndpoint>,
    timeout: Duration,
) -> io::Result<Arc<dyn AuthProvider>> {
    match endpoint {
        Some(endpoint) => {
            let provider = HttpAuthProvider::new(&endpoint.base_url, &endpoint.api_key, timeout)
                .map_err(|err| io::Error::other(format!("identity provider client: {err}")))?;
            Ok(Arc::new(provider))
        }
        None => {
            warn!("no identity provider configured; every credential will be rejected");
            Ok(Arc::new(FixtureAuthProvider::default()))
        }
    }
}

fn build_media_port<P>(
    properties: Arc<P>,
    endpoint: Option<&MediaStoreEndpoint>,
    timeout: Duration,
) -> io::Result<Arc<dyn PropertyMediaCommand>>
where
    P: PropertyRepository + 'static,
{
    match endpoint {
        Some(endpoint) => {
            let store = HttpMediaStore::new(endpoint.clone(), timeout)
                .map_err(|err| io::Error::other(format!("media store client: {err}")))?;
            Ok(Arc::new(MediaService::new(properties, Arc::new(store))))
        }
        None => {
            warn!("no media store configured; uploads are kept in memory");
            Ok(Arc::new(MediaService::new(
                properties,
                Arc::new(InMemoryMediaStore::default()),
            )))
        }
    }
}

/// Repository handles shared by every service.
struct Repositories<R, P, T> {
    profiles: Arc<R>,
    properties: Arc<P>,
    transitions: Arc<T>,
}

fn assemble<R, P, T>(
    config: &ServerConfig,
    repositories: Repositories<R, P, T>,
    clock: Arc<dyn Clock>,
) -> io::Result<HttpStatePorts>
where
    R: UserProfileRepository + 'static,
    P: PropertyRepository + 'static,
    T: StatusTransitionRepository + 'static,
{
    let Repositories {
        profiles,
        properties,
        transitions,
    } = repositories;
    let provider = build_auth_provider(config.auth_provider.as_ref(), config.timeout)?;
    let authenticator: Arc<dyn PrincipalAuthenticator> = Arc::new(AuthenticationService::new(
        PrincipalResolver::with_default_channels(provider),
        UserProvisioner::new(profiles, Arc::clone(&clock)),
    ));
    let media = build_media_port(
        Arc::clone(&properties),
        config.media_store.as_ref(),
        config.timeout,
    )?;
    let service = Arc::new(PropertyService::new(properties, transitions, clock));
    Ok(HttpStatePorts {
        authenticator,
        properties: Arc::clone(&service) as Arc<dyn PropertyQuery>,
        property_commands: service as Arc<dyn PropertyCommand>,
        media,
    })
}

/// Build the shared HTTP state from configured adapters.
///
/// # Errors
/// Returns [`io::Error`] when an HTTP client for an outbound dependency
/// cannot be constructed.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => assemble(
            config,
            Repositories {
                profiles: Arc::new(DieselUserProfileRepository::new(pool.clone())),
                properties: Arc::new(DieselPropertyRepository::new(pool.clone())),
                transitions: Arc::new(DieselStatusTransitionRepository::new(pool.clone())),
            },
            clock,
        )?,
        None => {
            warn!("no database configured; listings are kept in memory");
            assemble(
                config,
                Repositories {
                    profiles: Arc::new(InMemoryUserProfileRepository::default()),
                    properties: Arc::new(InMemoryPropertyRepository::default()),
                    transitions: Arc::new(InMemoryStatusTransitionRepository::default()),
                },
                clock,
            )?
        }
    };
    Ok(web::Data::new(HttpState::new(ports)))
}
