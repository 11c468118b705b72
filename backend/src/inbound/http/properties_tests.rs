//! Tests for property listing HTTP handlers.

use super::*;
use crate::domain::ports::CreatedProperty;
use crate::domain::{Error, PropertyStatus, StatusTransition, TransitionOutcome};
use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};
use crate::test_support::{fixture_timestamp, profile, property};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

async fn call(ports: MockPorts, request: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(ports.into_state())
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(list_properties)
                    .service(create_property)
                    .service(get_property)
                    .service(change_property_status)
                    .service(property_history),
            ),
    )
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn create_returns_pending_listing_with_slug() {
    let owner = profile(Some("sub-1"), "ada@example.com");
    let mut ports = MockPorts::for_caller(owner.clone());
    ports
        .property_commands
        .expect_create()
        .withf(|_, request| request.title == "Sunny Loft")
        .return_once(move |caller, _| {
            Ok(CreatedProperty {
                property: property(caller, "KTR-482", PropertyStatus::Pending),
                audit_recorded: true,
            })
        });

    let (status, body) = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/properties")
            .set_json(json!({"title": "Sunny Loft"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["shortCode"], "KTR-482");
    assert_eq!(body["slug"], "sunny-loft-ktr-482");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["auditRecorded"], true);
}

#[rstest]
#[actix_web::test]
async fn foreign_listing_reads_as_plain_not_found() {
    let mut ports = MockPorts::for_caller(profile(Some("sub-2"), "bob@example.com"));
    ports
        .properties
        .expect_get()
        .withf(|_, identifier| identifier == "KTR-482")
        .return_once(|_, _| Err(Error::not_found("listing not found")));

    let (status, body) = call(
        ports,
        test::TestRequest::get().uri("/api/v1/properties/KTR-482"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn retired_identifier_is_gone() {
    let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
    ports
        .properties
        .expect_get()
        .return_once(|_, _| Err(Error::gone("legacy identifiers are retired")));

    let (status, body) = call(
        ports,
        test::TestRequest::get().uri("/api/v1/properties/0123456789abcdef0123"),
    )
    .await;

    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], "gone");
}

#[rstest]
#[actix_web::test]
async fn unknown_status_name_is_rejected_before_the_service() {
    let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
    ports.property_commands.expect_change_status().times(0);

    let (status, body) = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/properties/KTR-482/status")
            .set_json(json!({"status": "archived"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["code"], "unknown_status");
}

#[rstest]
#[case(Error::conflict("listing changed concurrently"), StatusCode::CONFLICT)]
#[case(
    Error::policy_violation("pending listings await review")
        .with_details(json!({"code": "pending_review"})),
    StatusCode::FORBIDDEN
)]
#[actix_web::test]
async fn status_change_failures_map_to_statuses(
    #[case] failure: Error,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::for_caller(profile(Some("sub-1"), "ada@example.com"));
    ports
        .property_commands
        .expect_change_status()
        .return_once(move |_, _, _| Err(failure));

    let (status, _) = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/properties/KTR-482/status")
            .set_json(json!({"status": "inactive"})),
    )
    .await;

    assert_eq!(status, expected);
}

#[rstest]
#[actix_web::test]
async fn status_change_reports_missing_audit() {
    let owner = profile(Some("sub-1"), "ada@example.com");
    let mut ports = MockPorts::for_caller(owner.clone());
    ports
        .property_commands
        .expect_change_status()
        .withf(|_, identifier, request| {
            identifier == "sunny-loft-ktr-482"
                && request.target == PropertyStatus::Inactive
                && request.reason.as_deref() == Some("Renovation")
        })
        .return_once(move |caller, _, _| {
            Ok(TransitionOutcome {
                property: property(caller, "KTR-482", PropertyStatus::Inactive),
                audit_recorded: false,
            })
        });

    let (status, body) = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/properties/sunny-loft-ktr-482/status")
            .set_json(json!({"status": "inactive", "reason": "Renovation"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["auditRecorded"], false);
}

#[rstest]
#[actix_web::test]
async fn history_lists_transitions_in_order() {
    let owner = profile(Some("sub-1"), "ada@example.com");
    let listing = property(&owner, "KTR-482", PropertyStatus::Published);
    let rows = vec![
        StatusTransition {
            property_id: listing.id,
            from_status: None,
            to_status: PropertyStatus::Pending,
            actor_id: owner.id,
            reason: "Listing created".to_owned(),
            occurred_at: fixture_timestamp(),
        },
        StatusTransition {
            property_id: listing.id,
            from_status: Some(PropertyStatus::Pending),
            to_status: PropertyStatus::Published,
            actor_id: owner.id,
            reason: "Approved".to_owned(),
            occurred_at: fixture_timestamp(),
        },
    ];
    let mut ports = MockPorts::for_caller(owner);
    ports
        .properties
        .expect_history()
        .return_once(move |_, _| Ok(rows));

    let (status, body) = call(
        ports,
        test::TestRequest::get().uri("/api/v1/properties/KTR-482/history"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["fromStatus"], Value::Null);
    assert_eq!(entries[1]["fromStatus"], "pending");
    assert_eq!(entries[1]["toStatus"], "published");
}

#[rstest]
#[actix_web::test]
async fn list_is_private_and_uncached() {
    let owner = profile(Some("sub-1"), "ada@example.com");
    let mut ports = MockPorts::for_caller(owner);
    ports
        .properties
        .expect_list()
        .return_once(|caller| Ok(vec![property(caller, "KTR-482", PropertyStatus::Pending)]));

    let app = test::init_service(
        App::new()
            .app_data(ports.into_state())
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").service(list_properties)),
    )
    .await;
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/properties")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("private, no-cache, must-revalidate")
    );
}

#[rstest]
#[actix_web::test]
async fn unauthenticated_requests_stop_at_the_extractor() {
    let mut ports = MockPorts::default();
    ports
        .authenticator
        .expect_authenticate()
        .return_once(|_| Err(Error::unauthorized("login required")));
    ports.properties.expect_list().times(0);

    let (status, body) = call(ports, test::TestRequest::get().uri("/api/v1/properties")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}
