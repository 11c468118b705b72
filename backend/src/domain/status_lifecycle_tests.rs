//! Tests for the lifecycle edge set and the transition engine.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockPropertyRepository, MockStatusTransitionRepository, PropertyRepositoryError,
    StatusTransitionRepositoryError,
};
use crate::test_support::{fixture_clock, fixture_timestamp, profile, property};

type Engine = StatusLifecycleEngine<MockPropertyRepository, MockStatusTransitionRepository>;

fn engine(properties: MockPropertyRepository, transitions: MockStatusTransitionRepository) -> Engine {
    StatusLifecycleEngine::new(Arc::new(properties), Arc::new(transitions), fixture_clock())
}

#[fixture]
fn owner() -> crate::domain::UserProfile {
    profile(Some("sub-owner"), "owner@example.com")
}

fn reason() -> TransitionReason {
    TransitionReason::new(None).expect("default reason")
}

#[rstest]
fn edge_set_matches_the_lifecycle_graph() {
    use PropertyStatus::{Finalized, Inactive, Pending, Published};
    let expected = [
        (Pending, Published),
        (Published, Inactive),
        (Inactive, Published),
        (Published, Finalized),
        (Inactive, Finalized),
    ];
    for from in PropertyStatus::ALL {
        for to in PropertyStatus::ALL {
            assert_eq!(
                is_allowed(from, to),
                expected.contains(&(from, to)),
                "{from} -> {to}"
            );
        }
    }
}

#[rstest]
fn pending_is_immutable_for_owners_whatever_the_target() {
    for target in PropertyStatus::ALL {
        assert_eq!(
            check_owner_transition(PropertyStatus::Pending, target),
            Err(TransitionPolicyError::PendingImmutable)
        );
    }
}

#[rstest]
fn finalized_is_terminal() {
    for target in PropertyStatus::ALL {
        assert_eq!(
            check_owner_transition(PropertyStatus::Finalized, target),
            Err(TransitionPolicyError::Terminal)
        );
    }
}

#[rstest]
#[case(PropertyStatus::Published, PropertyStatus::Published)]
#[case(PropertyStatus::Published, PropertyStatus::Pending)]
#[case(PropertyStatus::Inactive, PropertyStatus::Inactive)]
#[case(PropertyStatus::Inactive, PropertyStatus::Pending)]
fn illegal_owner_edges_are_refused(#[case] from: PropertyStatus, #[case] to: PropertyStatus) {
    assert_eq!(
        check_owner_transition(from, to),
        Err(TransitionPolicyError::IllegalEdge)
    );
}

#[rstest]
fn policy_messages_do_not_echo_state_names() {
    let message = TransitionPolicyError::IllegalEdge.to_string();
    for status in PropertyStatus::ALL {
        assert!(!message.contains(status.as_str()));
    }
    let error: Error = TransitionPolicyError::PendingImmutable.into();
    assert_eq!(error.message(), "pending listings cannot change status");
    assert_eq!(
        error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("pending_immutable")
    );
}

#[rstest]
fn blank_reasons_fall_back_and_long_reasons_are_rejected() {
    assert_eq!(
        TransitionReason::new(Some("   ")).expect("reason").as_ref(),
        TransitionReason::OWNER_DEFAULT
    );
    let long = "x".repeat(TRANSITION_REASON_MAX + 1);
    let err = TransitionReason::new(Some(&long)).expect_err("too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn applies_owner_edge_and_appends_audit(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Published);
    let listing_id = listing.id;

    let mut properties = MockPropertyRepository::new();
    properties
        .expect_compare_and_set_status()
        .withf(move |id, expected, next| {
            *id == listing_id
                && *expected == PropertyStatus::Published
                && *next == PropertyStatus::Inactive
        })
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    let mut transitions = MockStatusTransitionRepository::new();
    transitions
        .expect_append()
        .times(1)
        .returning(move |transition| {
            sink.lock().expect("sink").push(transition.clone());
            Ok(())
        });

    let outcome = engine(properties, transitions)
        .request_transition(&listing, PropertyStatus::Inactive, &owner.id, reason())
        .await
        .expect("transition succeeds");

    assert_eq!(outcome.property.status, PropertyStatus::Inactive);
    assert!(outcome.audit_recorded);
    let rows = recorded.lock().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].from_status, Some(PropertyStatus::Published));
    assert_eq!(rows[0].to_status, PropertyStatus::Inactive);
    assert_eq!(rows[0].actor_id, owner.id);
    assert_eq!(rows[0].reason, TransitionReason::OWNER_DEFAULT);
    assert_eq!(rows[0].occurred_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn pending_listing_is_refused_without_touching_storage(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Pending);
    let mut properties = MockPropertyRepository::new();
    properties.expect_compare_and_set_status().times(0);
    let mut transitions = MockStatusTransitionRepository::new();
    transitions.expect_append().times(0);

    let err = engine(properties, transitions)
        .request_transition(&listing, PropertyStatus::Published, &owner.id, reason())
        .await
        .expect_err("pending is immutable");

    assert_eq!(err.code(), ErrorCode::PolicyViolation);
}

#[rstest]
#[tokio::test]
async fn lost_compare_and_swap_is_a_conflict(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Published);
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_compare_and_set_status()
        .return_once(|_, _, _| Ok(false));
    let mut transitions = MockStatusTransitionRepository::new();
    transitions.expect_append().times(0);

    let err = engine(properties, transitions)
        .request_transition(&listing, PropertyStatus::Finalized, &owner.id, reason())
        .await
        .expect_err("race lost");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn audit_failure_keeps_the_status_change(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Inactive);
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_compare_and_set_status()
        .return_once(|_, _, _| Ok(true));
    let mut transitions = MockStatusTransitionRepository::new();
    transitions
        .expect_append()
        .times(1)
        .return_once(|_| Err(StatusTransitionRepositoryError::connection("pool timed out")));

    let outcome = engine(properties, transitions)
        .request_transition(&listing, PropertyStatus::Published, &owner.id, reason())
        .await
        .expect("status change is kept");

    assert_eq!(outcome.property.status, PropertyStatus::Published);
    assert!(!outcome.audit_recorded);
}

#[rstest]
#[tokio::test]
async fn storage_outage_is_retryable(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Published);
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_compare_and_set_status()
        .return_once(|_, _, _| Err(PropertyRepositoryError::connection("refused")));
    let mut transitions = MockStatusTransitionRepository::new();
    transitions.expect_append().times(0);

    let err = engine(properties, transitions)
        .request_transition(&listing, PropertyStatus::Inactive, &owner.id, reason())
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(err.is_retryable());
}

#[rstest]
#[tokio::test]
async fn operator_approval_publishes_pending_listings(owner: crate::domain::UserProfile) {
    let operator = profile(Some("sub-operator"), "ops@example.com");
    let operator_id = operator.id;
    let listing = property(&owner, "KTR-482", PropertyStatus::Pending);
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_compare_and_set_status()
        .withf(|_, expected, next| {
            *expected == PropertyStatus::Pending && *next == PropertyStatus::Published
        })
        .return_once(|_, _, _| Ok(true));
    let mut transitions = MockStatusTransitionRepository::new();
    transitions
        .expect_append()
        .withf(move |row| row.actor_id == operator_id && row.reason == "listing reviewed")
        .return_once(|_| Ok(()));

    let outcome = engine(properties, transitions)
        .approve(
            &listing,
            &operator.id,
            TransitionReason::new(Some("listing reviewed")).expect("reason"),
        )
        .await
        .expect("approval");

    assert_eq!(outcome.property.status, PropertyStatus::Published);
}

#[rstest]
#[tokio::test]
async fn approval_requires_pending(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Inactive);
    let err = engine(MockPropertyRepository::new(), MockStatusTransitionRepository::new())
        .approve(&listing, &owner.id, reason())
        .await
        .expect_err("not pending");
    assert_eq!(err.code(), ErrorCode::PolicyViolation);
}

#[rstest]
#[tokio::test]
async fn creation_record_has_no_origin_status(owner: crate::domain::UserProfile) {
    let listing = property(&owner, "KTR-482", PropertyStatus::Pending);
    let listing_id = listing.id;
    let mut transitions = MockStatusTransitionRepository::new();
    transitions
        .expect_append()
        .withf(move |row| {
            row.property_id == listing_id
                && row.from_status.is_none()
                && row.to_status == PropertyStatus::Pending
                && row.reason == TransitionReason::CREATED
        })
        .return_once(|_| Ok(()));

    let recorded = engine(MockPropertyRepository::new(), transitions)
        .record_creation(&listing, &owner.id)
        .await;

    assert!(recorded);
}
