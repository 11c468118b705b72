//! Property listing handlers.
//!
//! ```text
//! GET  /api/v1/properties
//! POST /api/v1/properties {"title":"Sunny loft near the park"}
//! GET  /api/v1/properties/{identifier}
//! POST /api/v1/properties/{identifier}/status {"status":"inactive"}
//! GET  /api/v1/properties/{identifier}/history
//! ```
//!
//! `{identifier}` accepts a short code (`KTR-482`) or a share slug
//! (`sunny-loft-ktr-482`). Retired identifiers answer `410 Gone`.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChangeStatusRequest, CreatePropertyRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{
    ErrorSchema, PropertyMutationResponse, PropertyResponse, StatusTransitionResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_status};

/// Request body for `POST /api/v1/properties`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyBody {
    #[schema(example = "Sunny loft near the park")]
    pub title: String,
}

/// Request body for `POST /api/v1/properties/{identifier}/status`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusBody {
    /// Target status name.
    #[schema(example = "inactive")]
    pub status: String,
    /// Optional reason stored in the audit trail.
    #[serde(default)]
    #[schema(example = "Renovation under way")]
    pub reason: Option<String>,
}

/// List the caller's listings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    responses(
        (status = 200, description = "Caller's listings", body = [PropertyResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "listProperties"
)]
#[get("/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<HttpResponse> {
    let listings = state.properties.list(&caller.0).await?;
    let body: Vec<PropertyResponse> = listings.iter().map(PropertyResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Create a pending listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = CreatePropertyBody,
    responses(
        (status = 201, description = "Listing created", body = PropertyMutationResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Invalid title", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "createProperty"
)]
#[post("/properties")]
pub async fn create_property(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CreatePropertyBody>,
) -> ApiResult<HttpResponse> {
    let CreatePropertyBody { title } = payload.into_inner();
    let created = state
        .property_commands
        .create(&caller.0, CreatePropertyRequest { title })
        .await?;
    Ok(HttpResponse::Created().json(PropertyMutationResponse {
        property: PropertyResponse::from(&created.property),
        audit_recorded: created.audit_recorded,
    }))
}

/// Fetch one of the caller's listings.
///
/// Listings owned by someone else are indistinguishable from missing ones.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{identifier}",
    params(("identifier" = String, Path, description = "Short code or share slug")),
    responses(
        (status = 200, description = "Listing", body = PropertyResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 410, description = "Retired identifier", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "getProperty"
)]
#[get("/properties/{identifier}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    caller: Caller,
    identifier: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let property = state.properties.get(&caller.0, &identifier).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(PropertyResponse::from(&property)))
}

/// Apply an owner status change.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{identifier}/status",
    params(("identifier" = String, Path, description = "Short code or share slug")),
    request_body = ChangeStatusBody,
    responses(
        (status = 200, description = "Status changed", body = PropertyMutationResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Transition not allowed", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent change", body = ErrorSchema),
        (status = 410, description = "Retired identifier", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "changePropertyStatus"
)]
#[post("/properties/{identifier}/status")]
pub async fn change_property_status(
    state: web::Data<HttpState>,
    caller: Caller,
    identifier: web::Path<String>,
    payload: web::Json<ChangeStatusBody>,
) -> ApiResult<HttpResponse> {
    let ChangeStatusBody { status, reason } = payload.into_inner();
    let target = parse_status(&status, FieldName::new("status"))?;
    let outcome = state
        .property_commands
        .change_status(&caller.0, &identifier, ChangeStatusRequest { target, reason })
        .await?;
    Ok(HttpResponse::Ok().json(PropertyMutationResponse {
        property: PropertyResponse::from(&outcome.property),
        audit_recorded: outcome.audit_recorded,
    }))
}

/// Return a listing's status history, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{identifier}/history",
    params(("identifier" = String, Path, description = "Short code or share slug")),
    responses(
        (status = 200, description = "Audit trail", body = [StatusTransitionResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 410, description = "Retired identifier", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "getPropertyHistory"
)]
#[get("/properties/{identifier}/history")]
pub async fn property_history(
    state: web::Data<HttpState>,
    caller: Caller,
    identifier: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let history = state.properties.history(&caller.0, &identifier).await?;
    let body: Vec<StatusTransitionResponse> =
        history.iter().map(StatusTransitionResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

#[cfg(test)]
#[path = "properties_tests.rs"]
mod tests;
