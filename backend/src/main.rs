//! Backend entry-point: loads settings, runs migrations and serves the
//! listings API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use listings::inbound::http::health::HealthState;
use listings::inbound::http::session_config::{BuildMode, session_settings_from_env};
use listings::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use listings::settings::ServiceSettings;
use server::{AuthProviderEndpoint, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load()
        .map_err(|err| io::Error::other(format!("load settings: {err}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| io::Error::other(format!("session configuration: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let auth_provider = settings
        .auth_provider()
        .map_err(io::Error::other)?
        .map(|(base_url, api_key)| AuthProviderEndpoint { base_url, api_key });
    let media_store = settings.media_store().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_timeout(settings.timeout())
    .with_auth_provider(auth_provider)
    .with_media_store(media_store);

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| io::Error::other(format!("run migrations: {err}")))?;
        let pool = DbPool::new(
            PoolConfig::new(database_url)
                .with_max_size(settings.db_pool_size())
                .with_connection_timeout(settings.timeout())
                .with_query_timeout(settings.timeout()),
        )
        .await
        .map_err(|err| io::Error::other(format!("connect to database: {err}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listings service started");
    let result = server.await;
    health_state.mark_draining();
    result
}
