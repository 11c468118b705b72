//! In-process listings application shared by HTTP behaviour tests.
//!
//! Wires the real domain services over the in-memory adapters and a fixture
//! identity provider that knows two owners:
//!
//! | credential  | channel          | identity              |
//! |-------------|------------------|-----------------------|
//! | `token-ada` | bearer, session  | `sub-ada`, ada@…      |
//! | `token-bob` | bearer, session  | `sub-bob`, bob@…      |
//!
//! Any other token is treated as expired.

use std::future::Future;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use listings::Trace;
use listings::domain::ports::{FixtureAuthProvider, PropertyRepository};
use listings::domain::{
    AuthenticationService, Email, ExternalId, ExternalIdentity, MediaService, PrincipalResolver,
    ProfileId, PropertyService, PropertyStatus, ShortCode, StatusLifecycleEngine, StatusTransition,
    TransitionReason, UserProvisioner,
};
use listings::inbound::http::configure_api;
use listings::inbound::http::state::{HttpState, HttpStatePorts};
use listings::outbound::memory::{
    InMemoryMediaStore, InMemoryPropertyRepository, InMemoryStatusTransitionRepository,
    InMemoryUserProfileRepository,
};

pub const ADA: &str = "token-ada";
pub const BOB: &str = "token-bob";
pub const EXPIRED: &str = "token-expired";

fn identity(subject: &str, email: &str) -> ExternalIdentity {
    ExternalIdentity::new(
        ExternalId::new(subject).expect("external id"),
        Email::new(email).expect("email"),
    )
}

/// Shared adapters plus the HTTP state built over them.
pub struct ListingsApp {
    pub properties: InMemoryPropertyRepository,
    pub transitions: InMemoryStatusTransitionRepository,
    pub profiles: InMemoryUserProfileRepository,
    state: web::Data<HttpState>,
    key: Key,
    clock: Arc<dyn Clock>,
}

impl ListingsApp {
    pub fn new() -> Self {
        let properties = InMemoryPropertyRepository::default();
        let transitions = InMemoryStatusTransitionRepository::default();
        let profiles = InMemoryUserProfileRepository::default();
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let provider = FixtureAuthProvider::default()
            .with_bearer(ADA, identity("sub-ada", "ada@example.com"))
            .with_session(ADA, identity("sub-ada", "ada@example.com"))
            .with_bearer(BOB, identity("sub-bob", "bob@example.com"))
            .with_session(BOB, identity("sub-bob", "bob@example.com"));

        let service = Arc::new(PropertyService::new(
            Arc::new(properties.clone()),
            Arc::new(transitions.clone()),
            Arc::clone(&clock),
        ));
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            authenticator: Arc::new(AuthenticationService::new(
                PrincipalResolver::with_default_channels(Arc::new(provider)),
                UserProvisioner::new(Arc::new(profiles.clone()), Arc::clone(&clock)),
            )),
            properties: service.clone(),
            property_commands: service,
            media: Arc::new(MediaService::new(
                Arc::new(properties.clone()),
                Arc::new(InMemoryMediaStore::default()),
            )),
        }));

        Self {
            properties,
            transitions,
            profiles,
            state,
            key: Key::generate(),
            clock,
        }
    }

    /// Build and initialise the service.
    pub async fn service(
        &self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
        )
        .await
    }

    /// Move a pending listing to published the way operator tooling does.
    pub async fn approve(&self, short_code: &str) {
        let code = ShortCode::parse(short_code).expect("short code");
        let property = self
            .properties
            .find_by_short_code(&code)
            .await
            .expect("lookup")
            .expect("listing exists");
        let engine = StatusLifecycleEngine::new(
            Arc::new(self.properties.clone()),
            Arc::new(self.transitions.clone()),
            Arc::clone(&self.clock),
        );
        engine
            .approve(
                &property,
                &ProfileId::random(),
                TransitionReason::new(Some("approved by operator")).expect("reason"),
            )
            .await
            .expect("approval");
    }

    /// Stored status of one listing.
    pub async fn status_of(&self, short_code: &str) -> PropertyStatus {
        let code = ShortCode::parse(short_code).expect("short code");
        self.properties
            .find_by_short_code(&code)
            .await
            .expect("lookup")
            .expect("listing exists")
            .status
    }

    /// Audit rows recorded for one listing, in append order.
    pub fn audit_for(&self, short_code: &str) -> Vec<StatusTransition> {
        let code = ShortCode::parse(short_code).expect("short code");
        self.transitions
            .all()
            .into_iter()
            .filter(|row| {
                self.properties
                    .get(&row.property_id)
                    .is_some_and(|property| property.short_code == code)
            })
            .collect()
    }
}

/// Outcome of one request.
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub session_cookie: Option<Cookie<'static>>,
}

/// Credentials attached to a request.
#[derive(Default)]
pub struct As<'a> {
    pub bearer: Option<&'a str>,
    pub cookie: Option<Cookie<'static>>,
}

impl<'a> As<'a> {
    pub fn bearer(token: &'a str) -> Self {
        Self {
            bearer: Some(token),
            cookie: None,
        }
    }
}

pub async fn send<S, B>(app: &S, credentials: As<'_>, request: test::TestRequest) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut request = request;
    if let Some(token) = credentials.bearer {
        request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(cookie) = credentials.cookie {
        request = request.cookie(cookie);
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status().as_u16();
    let session_cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        session_cookie,
    }
}

/// Create a listing as `token` and return its short code.
pub async fn create_listing<S, B>(app: &S, token: &str, title: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        As::bearer(token),
        test::TestRequest::post()
            .uri("/api/v1/properties")
            .set_json(serde_json::json!({ "title": title })),
    )
    .await;
    assert_eq!(reply.status, 201, "create failed: {}", reply.body);
    reply.body["shortCode"]
        .as_str()
        .expect("short code")
        .to_owned()
}

/// Request a status change as `token`.
pub async fn change_status<S, B>(app: &S, token: &str, identifier: &str, status: &str) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        As::bearer(token),
        test::TestRequest::post()
            .uri(&format!("/api/v1/properties/{identifier}/status"))
            .set_json(serde_json::json!({ "status": status })),
    )
    .await
}

/// Scenario state: the application, the runtime driving it and the
/// responses observed so far.
pub struct ListingsWorld {
    runtime: Runtime,
    local: LocalSet,
    pub app: ListingsApp,
    pub short_code: Option<String>,
    pub replies: Vec<Reply>,
    pub session_cookie: Option<Cookie<'static>>,
}

impl ListingsWorld {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        Self {
            runtime,
            local: LocalSet::new(),
            app: ListingsApp::new(),
            short_code: None,
            replies: Vec::new(),
            session_cookie: None,
        }
    }

    /// Drive `future` to completion on the world's local task set.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }

    pub fn short_code(&self) -> String {
        self.short_code.clone().expect("a listing was created")
    }

    pub fn last_reply(&self) -> &Reply {
        self.replies.last().expect("a request was sent")
    }

    /// Send one request and record the reply.
    pub fn request(&mut self, credentials: As<'_>, request: test::TestRequest) {
        let reply = self.block_on(async {
            let service = self.app.service().await;
            send(&service, credentials, request).await
        });
        self.replies.push(reply);
    }

    /// Create a listing as Ada and remember its short code.
    pub fn create_as_ada(&mut self, title: &str) {
        let code = self.block_on(async {
            let service = self.app.service().await;
            create_listing(&service, ADA, title).await
        });
        self.short_code = Some(code);
    }
}
