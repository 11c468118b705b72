//! Behaviour tests for owner-driven status changes and their audit trail.
//!
//! Approval is performed through the lifecycle engine directly, as operator
//! tooling would; every other change goes through
//! `POST /api/v1/properties/{identifier}/status`.

#[allow(dead_code)]
#[path = "support/listings_app.rs"]
mod listings_app;

use listings::domain::PropertyStatus;
use listings_app::{ADA, ListingsWorld, change_status};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[fixture]
fn world() -> ListingsWorld {
    ListingsWorld::new()
}

fn request_status(world: &mut ListingsWorld, status: &str) {
    let code = world.short_code();
    let reply = world.block_on(async {
        let service = world.app.service().await;
        change_status(&service, ADA, &code, status).await
    });
    world.replies.push(reply);
}

#[given("Ada owns a listing titled Sunny Loft")]
fn ada_owns_a_listing_titled_sunny_loft(world: &mut ListingsWorld) {
    world.create_as_ada("Sunny Loft");
}

#[given("Ada owns an approved listing")]
fn ada_owns_an_approved_listing(world: &mut ListingsWorld) {
    world.create_as_ada("Harbour View");
    let code = world.short_code();
    world.block_on(world.app.approve(&code));
}

#[when("Ada marks the listing inactive")]
fn ada_marks_the_listing_inactive(world: &mut ListingsWorld) {
    request_status(world, "inactive");
}

#[when("Ada republishes the listing")]
fn ada_republishes_the_listing(world: &mut ListingsWorld) {
    request_status(world, "published");
}

#[when("Ada finalizes the listing")]
fn ada_finalizes_the_listing(world: &mut ListingsWorld) {
    request_status(world, "finalized");
}

#[when("Ada sends two simultaneous deactivation requests")]
fn ada_sends_two_simultaneous_deactivation_requests(world: &mut ListingsWorld) {
    let code = world.short_code();
    let (first, second) = world.block_on(async {
        let service = world.app.service().await;
        futures::join!(
            change_status(&service, ADA, &code, "inactive"),
            change_status(&service, ADA, &code, "inactive"),
        )
    });
    world.replies.push(first);
    world.replies.push(second);
}

#[when("Ada sends simultaneous deactivation and finalization requests")]
fn ada_sends_simultaneous_deactivation_and_finalization_requests(world: &mut ListingsWorld) {
    let code = world.short_code();
    let (deactivation, finalization) = world.block_on(async {
        let service = world.app.service().await;
        futures::join!(
            change_status(&service, ADA, &code, "inactive"),
            change_status(&service, ADA, &code, "finalized"),
        )
    });
    world.replies.push(deactivation);
    world.replies.push(finalization);
}

#[then("the response status is forbidden")]
fn the_response_status_is_forbidden(world: &mut ListingsWorld) {
    let reply = world.last_reply();
    assert_eq!(reply.status, 403, "unexpected body: {}", reply.body);
    assert_eq!(reply.body["code"], "policy_violation");
    assert!(reply.body["details"]["code"].is_string());
}

#[then("the listing has only its creation record")]
fn the_listing_has_only_its_creation_record(world: &mut ListingsWorld) {
    let audit = world.app.audit_for(&world.short_code());
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].from_status, None);
    assert_eq!(audit[0].to_status, PropertyStatus::Pending);
}

#[then("every transition succeeds")]
fn every_transition_succeeds(world: &mut ListingsWorld) {
    for reply in &world.replies {
        assert_eq!(reply.status, 200, "unexpected body: {}", reply.body);
        assert_eq!(reply.body["auditRecorded"], true);
    }
}

#[then("the owner transitions alternate between inactive and published")]
fn the_owner_transitions_alternate(world: &mut ListingsWorld) {
    let audit = world.app.audit_for(&world.short_code());
    let moves: Vec<_> = audit
        .iter()
        .skip_while(|row| row.to_status != PropertyStatus::Published)
        .skip(1)
        .map(|row| (row.from_status, row.to_status))
        .collect();
    assert_eq!(
        moves,
        vec![
            (Some(PropertyStatus::Published), PropertyStatus::Inactive),
            (Some(PropertyStatus::Inactive), PropertyStatus::Published),
        ]
    );
}

#[then("one request succeeds and the other conflicts")]
fn one_request_succeeds_and_the_other_conflicts(world: &mut ListingsWorld) {
    let mut statuses: Vec<u16> = world.replies.iter().map(|reply| reply.status).collect();
    statuses.sort_unstable();
    assert_eq!(statuses, vec![200, 409]);
    let conflict = world
        .replies
        .iter()
        .find(|reply| reply.status == 409)
        .expect("conflict reply");
    assert_eq!(conflict.body["code"], "conflict");
}

#[then("exactly one deactivation is audited")]
fn exactly_one_deactivation_is_audited(world: &mut ListingsWorld) {
    let audit = world.app.audit_for(&world.short_code());
    let deactivations = audit
        .iter()
        .filter(|row| row.to_status == PropertyStatus::Inactive)
        .count();
    assert_eq!(deactivations, 1);
}

#[then("the listing status matches the latest audit record")]
fn the_listing_status_matches_the_latest_audit_record(world: &mut ListingsWorld) {
    let code = world.short_code();
    let stored = world.block_on(world.app.status_of(&code));
    let latest = world
        .app
        .audit_for(&code)
        .into_iter()
        .max_by_key(|row| row.occurred_at)
        .expect("audit rows");
    assert_eq!(stored, latest.to_status);

    let winner = world
        .replies
        .iter()
        .find(|reply| reply.status == 200)
        .expect("successful reply");
    assert_eq!(winner.body["status"], stored.as_str());
    assert_eq!(winner.body["auditRecorded"], true);
}

#[then("exactly one owner transition is audited")]
fn exactly_one_owner_transition_is_audited(world: &mut ListingsWorld) {
    let audit = world.app.audit_for(&world.short_code());
    let owner_moves: Vec<_> = audit
        .iter()
        .filter(|row| row.from_status == Some(PropertyStatus::Published))
        .collect();
    assert_eq!(owner_moves.len(), 1, "audit: {audit:?}");
    assert_eq!(audit.len(), 3);
}

#[scenario(
    path = "tests/features/status_lifecycle.feature",
    name = "Pending listings cannot change status"
)]
fn pending_listings_cannot_change_status(world: ListingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_lifecycle.feature",
    name = "Deactivating and republishing is audited"
)]
fn deactivating_and_republishing_is_audited(world: ListingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_lifecycle.feature",
    name = "Finalized listings are terminal"
)]
fn finalized_listings_are_terminal(world: ListingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_lifecycle.feature",
    name = "Simultaneous transitions conflict"
)]
fn simultaneous_transitions_conflict(world: ListingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_lifecycle.feature",
    name = "Racing deactivation and finalization leave status and audit in agreement"
)]
fn racing_deactivation_and_finalization_agree(world: ListingsWorld) {
    drop(world);
}
