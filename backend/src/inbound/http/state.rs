//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    PrincipalAuthenticator, PropertyCommand, PropertyMediaCommand, PropertyQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub authenticator: Arc<dyn PrincipalAuthenticator>,
    pub properties: Arc<dyn PropertyQuery>,
    pub property_commands: Arc<dyn PropertyCommand>,
    pub media: Arc<dyn PropertyMediaCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub authenticator: Arc<dyn PrincipalAuthenticator>,
    pub properties: Arc<dyn PropertyQuery>,
    pub property_commands: Arc<dyn PropertyCommand>,
    pub media: Arc<dyn PropertyMediaCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use listings::domain::ports::FixtureAuthProvider;
    /// use listings::domain::{
    ///     AuthenticationService, MediaService, PrincipalResolver, PropertyService,
    ///     UserProvisioner,
    /// };
    /// use listings::inbound::http::state::{HttpState, HttpStatePorts};
    /// use listings::outbound::memory::{
    ///     InMemoryMediaStore, InMemoryPropertyRepository, InMemoryStatusTransitionRepository,
    ///     InMemoryUserProfileRepository,
    /// };
    /// use mockable::DefaultClock;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let properties = Arc::new(InMemoryPropertyRepository::default());
    /// let service = Arc::new(PropertyService::new(
    ///     Arc::clone(&properties),
    ///     Arc::new(InMemoryStatusTransitionRepository::default()),
    ///     clock.clone(),
    /// ));
    /// let ports = HttpStatePorts {
    ///     authenticator: Arc::new(AuthenticationService::new(
    ///         PrincipalResolver::with_default_channels(Arc::new(FixtureAuthProvider::default())),
    ///         UserProvisioner::new(Arc::new(InMemoryUserProfileRepository::default()), clock),
    ///     )),
    ///     properties: service.clone(),
    ///     property_commands: service,
    ///     media: Arc::new(MediaService::new(
    ///         properties,
    ///         Arc::new(InMemoryMediaStore::default()),
    ///     )),
    /// };
    /// let state = HttpState::new(ports);
    /// let _authenticator = state.authenticator.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            authenticator,
            properties,
            property_commands,
            media,
        } = ports;
        Self {
            authenticator,
            properties,
            property_commands,
            media,
        }
    }
}
