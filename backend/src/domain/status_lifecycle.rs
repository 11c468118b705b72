//! Listing status lifecycle.
//!
//! The lifecycle is an explicit edge set:
//!
//! | from        | to          | initiated by |
//! |-------------|-------------|--------------|
//! | `pending`   | `published` | operator     |
//! | `published` | `inactive`  | owner        |
//! | `inactive`  | `published` | owner        |
//! | `published` | `finalized` | owner        |
//! | `inactive`  | `finalized` | owner        |
//!
//! [`is_allowed`] and [`check_owner_transition`] are pure. The
//! [`StatusLifecycleEngine`] applies an allowed edge with a compare-and-swap
//! on the expected starting status, then appends the audit record.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::port_error_mapping::map_property_error;
use super::ports::{PropertyRepository, StatusTransitionRepository};
use super::{Error, ProfileId, Property, PropertyId, PropertyStatus};

/// Maximum length of a transition reason.
pub const TRANSITION_REASON_MAX: usize = 500;

/// Who may walk an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionInitiator {
    /// Administrative approval outside the owner-facing surface.
    Operator,
    /// The listing's owner.
    Owner,
}

const EDGES: [(PropertyStatus, PropertyStatus, TransitionInitiator); 5] = [
    (
        PropertyStatus::Pending,
        PropertyStatus::Published,
        TransitionInitiator::Operator,
    ),
    (
        PropertyStatus::Published,
        PropertyStatus::Inactive,
        TransitionInitiator::Owner,
    ),
    (
        PropertyStatus::Inactive,
        PropertyStatus::Published,
        TransitionInitiator::Owner,
    ),
    (
        PropertyStatus::Published,
        PropertyStatus::Finalized,
        TransitionInitiator::Owner,
    ),
    (
        PropertyStatus::Inactive,
        PropertyStatus::Finalized,
        TransitionInitiator::Owner,
    ),
];

fn edge_initiator(from: PropertyStatus, to: PropertyStatus) -> Option<TransitionInitiator> {
    EDGES
        .iter()
        .find(|(edge_from, edge_to, _)| *edge_from == from && *edge_to == to)
        .map(|(_, _, initiator)| *initiator)
}

/// Whether `(from, to)` is an edge of the lifecycle graph, for any initiator.
///
/// # Examples
/// ```
/// use listings::domain::{PropertyStatus, is_allowed};
///
/// assert!(is_allowed(PropertyStatus::Published, PropertyStatus::Inactive));
/// assert!(!is_allowed(PropertyStatus::Finalized, PropertyStatus::Published));
/// ```
pub fn is_allowed(from: PropertyStatus, to: PropertyStatus) -> bool {
    edge_initiator(from, to).is_some()
}

/// Reasons an owner-initiated transition is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPolicyError {
    /// Pending listings await review and cannot be changed by their owner.
    PendingImmutable,
    /// Finalized listings have no outgoing edges.
    Terminal,
    /// The requested edge does not exist or is not owner-initiated.
    IllegalEdge,
}

impl TransitionPolicyError {
    /// Machine-readable code placed in error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::PendingImmutable => "pending_immutable",
            Self::Terminal => "terminal_status",
            Self::IllegalEdge => "illegal_transition",
        }
    }
}

impl fmt::Display for TransitionPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingImmutable => write!(f, "pending listings cannot change status"),
            Self::Terminal => write!(f, "finalized listings can no longer change status"),
            Self::IllegalEdge => write!(
                f,
                "this listing cannot be moved to the requested status from where it is now"
            ),
        }
    }
}

impl std::error::Error for TransitionPolicyError {}

impl From<TransitionPolicyError> for Error {
    fn from(value: TransitionPolicyError) -> Self {
        Error::policy_violation(value.to_string()).with_details(json!({ "code": value.code() }))
    }
}

/// Check an owner-initiated transition.
///
/// Pending is checked first, whatever the target.
pub fn check_owner_transition(
    from: PropertyStatus,
    to: PropertyStatus,
) -> Result<(), TransitionPolicyError> {
    match from {
        PropertyStatus::Pending => Err(TransitionPolicyError::PendingImmutable),
        PropertyStatus::Finalized => Err(TransitionPolicyError::Terminal),
        _ => match edge_initiator(from, to) {
            Some(TransitionInitiator::Owner) => Ok(()),
            _ => Err(TransitionPolicyError::IllegalEdge),
        },
    }
}

/// Validated free-text reason attached to a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionReason(String);

impl TransitionReason {
    /// Reason recorded when the caller gives none.
    pub const OWNER_DEFAULT: &'static str = "owner request";
    /// Reason recorded for the creation event.
    pub const CREATED: &'static str = "listing created";

    /// Validate a caller-supplied reason; blank input falls back to
    /// [`Self::OWNER_DEFAULT`].
    pub fn new(raw: Option<&str>) -> Result<Self, Error> {
        let trimmed = raw.map(str::trim).filter(|value| !value.is_empty());
        match trimmed {
            None => Ok(Self(Self::OWNER_DEFAULT.to_owned())),
            Some(value) if value.chars().count() > TRANSITION_REASON_MAX => Err(
                Error::invalid_request(format!(
                    "reason must be at most {TRANSITION_REASON_MAX} characters"
                ))
                .with_details(json!({ "field": "reason", "code": "too_long" })),
            ),
            Some(value) => Ok(Self(value.to_owned())),
        }
    }
}

impl AsRef<str> for TransitionReason {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Immutable audit record of one status change, including creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub property_id: PropertyId,
    pub from_status: Option<PropertyStatus>,
    pub to_status: PropertyStatus,
    pub actor_id: ProfileId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Result of an applied transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The listing with its new status.
    pub property: Property,
    /// Whether the audit record was written.
    pub audit_recorded: bool,
}

/// Applies lifecycle edges against persistence.
pub struct StatusLifecycleEngine<P, T> {
    properties: Arc<P>,
    transitions: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<P, T> Clone for StatusLifecycleEngine<P, T> {
    fn clone(&self) -> Self {
        Self {
            properties: Arc::clone(&self.properties),
            transitions: Arc::clone(&self.transitions),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P, T> StatusLifecycleEngine<P, T> {
    /// Create an engine over the given repositories.
    pub fn new(properties: Arc<P>, transitions: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            properties,
            transitions,
            clock,
        }
    }
}

impl<P, T> StatusLifecycleEngine<P, T>
where
    P: PropertyRepository,
    T: StatusTransitionRepository,
{
    /// Apply an owner-requested transition.
    ///
    /// The caller must already have passed the ownership guard.
    pub async fn request_transition(
        &self,
        property: &Property,
        target: PropertyStatus,
        actor: &ProfileId,
        reason: TransitionReason,
    ) -> Result<TransitionOutcome, Error> {
        if let Err(policy) = check_owner_transition(property.status, target) {
            info!(
                property_id = %property.id,
                actor_id = %actor,
                from = %property.status,
                to = %target,
                policy = policy.code(),
                "status transition refused"
            );
            return Err(policy.into());
        }
        self.apply(property, target, actor, reason).await
    }

    /// Approve a pending listing on behalf of an operator.
    pub async fn approve(
        &self,
        property: &Property,
        operator: &ProfileId,
        reason: TransitionReason,
    ) -> Result<TransitionOutcome, Error> {
        if property.status != PropertyStatus::Pending {
            return Err(Error::policy_violation("only pending listings can be approved")
                .with_details(json!({ "code": "not_pending" })));
        }
        self.apply(property, PropertyStatus::Published, operator, reason)
            .await
    }

    /// Append the `null -> pending` creation record.
    ///
    /// Returns whether the record was written; failures are logged.
    pub async fn record_creation(&self, property: &Property, actor: &ProfileId) -> bool {
        let transition = StatusTransition {
            property_id: property.id,
            from_status: None,
            to_status: PropertyStatus::Pending,
            actor_id: *actor,
            reason: TransitionReason::CREATED.to_owned(),
            occurred_at: property.created_at,
        };
        self.append_audit(&transition).await
    }

    async fn apply(
        &self,
        property: &Property,
        target: PropertyStatus,
        actor: &ProfileId,
        reason: TransitionReason,
    ) -> Result<TransitionOutcome, Error> {
        let from = property.status;
        let swapped = self
            .properties
            .compare_and_set_status(&property.id, from, target)
            .await
            .map_err(map_property_error)?;
        if !swapped {
            info!(
                property_id = %property.id,
                actor_id = %actor,
                expected = %from,
                "status transition lost a concurrent update"
            );
            return Err(
                Error::conflict("the listing was changed by another request; reload and retry")
                    .with_details(json!({ "code": "status_conflict" })),
            );
        }

        let transition = StatusTransition {
            property_id: property.id,
            from_status: Some(from),
            to_status: target,
            actor_id: *actor,
            reason: reason.0,
            occurred_at: self.clock.utc(),
        };
        let audit_recorded = self.append_audit(&transition).await;

        let mut updated = property.clone();
        updated.status = target;
        Ok(TransitionOutcome {
            property: updated,
            audit_recorded,
        })
    }

    async fn append_audit(&self, transition: &StatusTransition) -> bool {
        match self.transitions.append(transition).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    %error,
                    property_id = %transition.property_id,
                    actor_id = %transition.actor_id,
                    from = ?transition.from_status,
                    to = %transition.to_status,
                    reason = %transition.reason,
                    occurred_at = %transition.occurred_at,
                    "status audit record could not be written; status change kept"
                );
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "status_lifecycle_tests.rs"]
mod tests;
