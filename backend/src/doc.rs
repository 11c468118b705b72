//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http` together with
//! the schema wrappers from `inbound::http::schemas`, so domain types never
//! derive utoipa traits themselves. Two security schemes are declared: a
//! provider bearer token and the ambient session cookie.
//!
//! The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::media::{DeleteMediaBody, DeleteMediaResponse};
use crate::inbound::http::properties::{ChangeStatusBody, CreatePropertyBody};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, MediaResponse, ProfileResponse, PropertyMutationResponse,
    PropertyResponse, StatusTransitionResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Access token issued by the identity provider."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Ambient session cookie issued by POST /api/v1/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Listings API",
        description = "Owner-scoped property listings, their status lifecycle and media.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::profile::current_profile,
        crate::inbound::http::profile::establish_session,
        crate::inbound::http::profile::clear_session,
        crate::inbound::http::properties::list_properties,
        crate::inbound::http::properties::create_property,
        crate::inbound::http::properties::get_property,
        crate::inbound::http::properties::change_property_status,
        crate::inbound::http::properties::property_history,
        crate::inbound::http::media::upload_media,
        crate::inbound::http::media::delete_media,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProfileResponse,
        PropertyResponse,
        PropertyMutationResponse,
        StatusTransitionResponse,
        MediaResponse,
        CreatePropertyBody,
        ChangeStatusBody,
        DeleteMediaBody,
        DeleteMediaResponse,
    )),
    tags(
        (name = "profile", description = "Caller profile and ambient sessions"),
        (name = "properties", description = "Owner-scoped listings and their lifecycle"),
        (name = "media", description = "Listing images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
