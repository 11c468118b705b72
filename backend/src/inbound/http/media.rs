//! Listing media handlers.
//!
//! ```text
//! POST   /api/v1/properties/{identifier}/media   (raw image body)
//! DELETE /api/v1/properties/{identifier}/media   {"paths":["properties/ktr-482/a.jpg"]}
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::MediaUploadRequest;
use crate::domain::{Error, MAX_MEDIA_BYTES};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::{ErrorSchema, MediaResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_header_error};

/// Payload limit for upload routes.
///
/// One byte above the accepted maximum so the service, not the extractor,
/// reports an oversize body as a validation failure.
pub fn upload_payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(MAX_MEDIA_BYTES + 1)
}

/// Request body for `DELETE /api/v1/properties/{identifier}/media`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaBody {
    /// Object paths previously returned by an upload.
    pub paths: Vec<String>,
}

/// Response body for a media deletion.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaResponse {
    pub deleted: usize,
}

fn content_type(req: &HttpRequest) -> Result<String, Error> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| missing_header_error(FieldName::new("Content-Type")))
}

/// Upload an image for one of the caller's listings.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{identifier}/media",
    params(("identifier" = String, Path, description = "Short code or share slug")),
    request_body(
        content = Vec<u8>,
        content_type = "image/jpeg",
        description = "JPEG, PNG, WebP or GIF image up to 10 MiB"
    ),
    responses(
        (status = 201, description = "Stored", body = MediaResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 410, description = "Retired identifier", body = ErrorSchema),
        (status = 422, description = "Unsupported or oversize image", body = ErrorSchema),
        (status = 503, description = "Media store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "uploadPropertyMedia"
)]
#[post("/properties/{identifier}/media")]
pub async fn upload_media(
    state: web::Data<HttpState>,
    caller: Caller,
    identifier: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let upload = MediaUploadRequest {
        content_type: content_type(&req)?,
        bytes: body.to_vec(),
    };
    let stored = state.media.upload(&caller.0, &identifier, upload).await?;
    Ok(HttpResponse::Created().json(MediaResponse::from(stored)))
}

/// Delete media belonging to one of the caller's listings.
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{identifier}/media",
    params(("identifier" = String, Path, description = "Short code or share slug")),
    request_body = DeleteMediaBody,
    responses(
        (status = 200, description = "Deleted", body = DeleteMediaResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Path outside the listing", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 410, description = "Retired identifier", body = ErrorSchema),
        (status = 422, description = "Invalid path list", body = ErrorSchema),
        (status = 503, description = "Media store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "deletePropertyMedia"
)]
#[delete("/properties/{identifier}/media")]
pub async fn delete_media(
    state: web::Data<HttpState>,
    caller: Caller,
    identifier: web::Path<String>,
    payload: web::Json<DeleteMediaBody>,
) -> ApiResult<web::Json<DeleteMediaResponse>> {
    let DeleteMediaBody { paths } = payload.into_inner();
    let deleted = state.media.delete(&caller.0, &identifier, paths).await?;
    Ok(web::Json(DeleteMediaResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaContentType, MediaPath, StoredMedia};
    use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};
    use crate::test_support::profile;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    async fn call(ports: MockPorts, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .app_data(upload_payload_config())
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .service(upload_media)
                        .service(delete_media),
                ),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (
            status,
            serde_json::from_slice(&body).expect("JSON response body"),
        )
    }

    #[actix_web::test]
    async fn upload_forwards_declared_type_and_bytes() {
        let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
        ports
            .media
            .expect_upload()
            .withf(|_, identifier, upload| {
                identifier == "KTR-482"
                    && upload.content_type == "image/png"
                    && upload.bytes == b"png-bytes"
            })
            .return_once(|_, _, upload| {
                Ok(StoredMedia {
                    path: MediaPath::new("properties/ktr-482/abc.png").expect("path"),
                    public_url: "http://localhost:8080/media/properties/ktr-482/abc.png"
                        .to_owned(),
                    content_type: MediaContentType::Png,
                    size_bytes: upload.bytes.len(),
                })
            });

        let (status, body) = call(
            ports,
            test::TestRequest::post()
                .uri("/api/v1/properties/KTR-482/media")
                .insert_header((header::CONTENT_TYPE, "image/png"))
                .set_payload(&b"png-bytes"[..]),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["path"], "properties/ktr-482/abc.png");
        assert_eq!(body["contentType"], "image/png");
        assert_eq!(body["sizeBytes"], 9);
    }

    #[actix_web::test]
    async fn upload_without_content_type_is_rejected() {
        let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
        ports.media.expect_upload().times(0);

        let (status, body) = call(
            ports,
            test::TestRequest::post()
                .uri("/api/v1/properties/KTR-482/media")
                .set_payload(&b"bytes"[..]),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["code"], "missing_header");
    }

    #[actix_web::test]
    async fn foreign_delete_paths_are_forbidden() {
        let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
        ports
            .media
            .expect_delete()
            .withf(|_, _, paths| paths == &vec!["properties/abc-234/x.jpg".to_owned()])
            .return_once(|_, _, _| {
                Err(Error::policy_violation("media path outside this listing")
                    .with_details(json!({"code": "foreign_media_path"})))
            });

        let (status, body) = call(
            ports,
            test::TestRequest::delete()
                .uri("/api/v1/properties/KTR-482/media")
                .set_json(json!({"paths": ["properties/abc-234/x.jpg"]})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["details"]["code"], "foreign_media_path");
    }

    #[actix_web::test]
    async fn delete_reports_the_removed_count() {
        let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
        ports.media.expect_delete().return_once(|_, _, paths| Ok(paths.len()));

        let (status, body) = call(
            ports,
            test::TestRequest::delete()
                .uri("/api/v1/properties/KTR-482/media")
                .set_json(json!({"paths": ["properties/ktr-482/a.jpg", "properties/ktr-482/b.jpg"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], 2);
    }
}
