//! Listing domain services.
//!
//! Implements the property driving ports on top of the ownership guard and
//! the lifecycle engine. Creation allocates a short code, retrying when the
//! repository reports a collision, and records the `null -> pending` audit
//! row.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::port_error_mapping::{map_property_error, map_transition_error};
use super::ports::{
    ChangeStatusRequest, CreatePropertyRequest, CreatedProperty, PropertyCommand, PropertyQuery,
    PropertyRepository, PropertyRepositoryError, StatusTransitionRepository,
};
use super::{
    Error, OwnershipGuard, Property, PropertyTitle, PropertyValidationError, ShortCode,
    StatusLifecycleEngine, StatusTransition, TransitionOutcome, TransitionReason, UserProfile,
    generate_short_code,
};

/// Attempts made to find an unused short code before giving up.
pub const MAX_SHORT_CODE_ATTEMPTS: usize = 5;

/// Source of candidate short codes.
pub trait ShortCodeSource: Send + Sync {
    fn next_code(&self) -> ShortCode;
}

/// Draws codes from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomShortCodes;

impl ShortCodeSource for RandomShortCodes {
    fn next_code(&self) -> ShortCode {
        generate_short_code()
    }
}

/// Listing service implementing [`PropertyQuery`] and [`PropertyCommand`].
pub struct PropertyService<P, T> {
    properties: Arc<P>,
    transitions: Arc<T>,
    guard: OwnershipGuard<P>,
    lifecycle: StatusLifecycleEngine<P, T>,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn ShortCodeSource>,
}

impl<P, T> PropertyService<P, T> {
    /// Create a service drawing random short codes.
    pub fn new(properties: Arc<P>, transitions: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self::with_code_source(properties, transitions, clock, Arc::new(RandomShortCodes))
    }

    /// Create a service with an explicit short-code source.
    pub fn with_code_source(
        properties: Arc<P>,
        transitions: Arc<T>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn ShortCodeSource>,
    ) -> Self {
        Self {
            guard: OwnershipGuard::new(Arc::clone(&properties)),
            lifecycle: StatusLifecycleEngine::new(
                Arc::clone(&properties),
                Arc::clone(&transitions),
                Arc::clone(&clock),
            ),
            properties,
            transitions,
            clock,
            codes,
        }
    }

    /// Lifecycle engine shared with operator tooling.
    pub fn lifecycle(&self) -> &StatusLifecycleEngine<P, T> {
        &self.lifecycle
    }
}

fn invalid_title(err: PropertyValidationError) -> Error {
    let code = match err {
        PropertyValidationError::EmptyTitle => "empty",
        PropertyValidationError::TitleTooLong { .. } => "too_long",
        PropertyValidationError::UnknownStatus => "invalid",
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "title",
        "code": code,
    }))
}

impl<P, T> PropertyService<P, T>
where
    P: PropertyRepository,
    T: StatusTransitionRepository,
{
    async fn insert_with_fresh_code(
        &self,
        caller: &UserProfile,
        title: PropertyTitle,
    ) -> Result<Property, Error> {
        let created_at = self.clock.utc();
        for attempt in 1..=MAX_SHORT_CODE_ATTEMPTS {
            let property =
                Property::new_pending(self.codes.next_code(), caller.id, title.clone(), created_at);
            match self.properties.insert(&property).await {
                Ok(()) => return Ok(property),
                Err(PropertyRepositoryError::DuplicateShortCode { short_code }) => {
                    debug!(attempt, %short_code, "short code collision; drawing another");
                }
                Err(err) => return Err(map_property_error(err)),
            }
        }
        Err(Error::service_unavailable(
            "could not allocate a listing code; please retry",
        ))
    }
}

#[async_trait]
impl<P, T> PropertyQuery for PropertyService<P, T>
where
    P: PropertyRepository,
    T: StatusTransitionRepository,
{
    async fn get(&self, caller: &UserProfile, identifier: &str) -> Result<Property, Error> {
        self.guard.load_owned(caller, identifier).await
    }

    async fn list(&self, caller: &UserProfile) -> Result<Vec<Property>, Error> {
        self.properties
            .list_by_owner(&caller.id)
            .await
            .map_err(map_property_error)
    }

    async fn history(
        &self,
        caller: &UserProfile,
        identifier: &str,
    ) -> Result<Vec<StatusTransition>, Error> {
        let property = self.guard.load_owned(caller, identifier).await?;
        self.transitions
            .list_for_property(&property.id)
            .await
            .map_err(map_transition_error)
    }
}

#[async_trait]
impl<P, T> PropertyCommand for PropertyService<P, T>
where
    P: PropertyRepository,
    T: StatusTransitionRepository,
{
    async fn create(
        &self,
        caller: &UserProfile,
        request: CreatePropertyRequest,
    ) -> Result<CreatedProperty, Error> {
        let title = PropertyTitle::new(&request.title).map_err(invalid_title)?;
        let property = self.insert_with_fresh_code(caller, title).await?;
        let audit_recorded = self.lifecycle.record_creation(&property, &caller.id).await;
        info!(
            property_id = %property.id,
            short_code = %property.short_code,
            owner_id = %caller.id,
            "listing created"
        );
        Ok(CreatedProperty {
            property,
            audit_recorded,
        })
    }

    async fn change_status(
        &self,
        caller: &UserProfile,
        identifier: &str,
        request: ChangeStatusRequest,
    ) -> Result<TransitionOutcome, Error> {
        let property = self.guard.load_owned(caller, identifier).await?;
        let reason = TransitionReason::new(request.reason.as_deref())?;
        self.lifecycle
            .request_transition(&property, request.target, &caller.id, reason)
            .await
    }
}

#[cfg(test)]
#[path = "property_service_tests.rs"]
mod tests;
