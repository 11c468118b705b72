//! Caller profile and ambient session handlers.
//!
//! ```text
//! GET    /api/v1/me
//! POST   /api/v1/session   (Authorization: Bearer <provider token>)
//! DELETE /api/v1/session
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};

use crate::domain::{Error, RequestCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Caller, bearer_from_headers};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{ErrorSchema, ProfileResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Return the caller's provisioned profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "currentProfile"
)]
#[get("/me")]
pub async fn current_profile(caller: Caller) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ProfileResponse::from(caller.into_inner()))
}

/// Establish an ambient cookie session from a valid bearer credential.
///
/// Only the bearer channel is consulted: an existing cookie never vouches for
/// a new one.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Session established", body = ProfileResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Missing or invalid bearer", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "establishSession"
)]
#[post("/session")]
pub async fn establish_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let token = bearer_from_headers(req.headers())
        .ok_or_else(|| Error::unauthorized("bearer credential required"))?;
    let profile = state
        .authenticator
        .authenticate(&RequestCredentials::bearer(token.clone()))
        .await?;
    session.persist_provider_session(&token)?;
    tracing::info!(profile_id = %profile.id, "ambient session established");
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// Drop the ambient session cookie.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["profile"],
    operation_id = "clearSession",
    security([])
)]
#[delete("/session")]
pub async fn clear_session(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
