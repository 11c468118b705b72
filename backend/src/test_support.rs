//! Shared test doubles and builders for unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Email, ExternalId, ExternalIdentity, FullName, ProfileId, ProfileRole, Property,
    PropertyStatus, PropertyTitle, ShortCode, UserProfile,
};

/// Clock frozen at a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn fixture_clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(fixture_timestamp()))
}

pub fn identity(external_id: &str, email: &str) -> ExternalIdentity {
    ExternalIdentity::new(
        ExternalId::new(external_id).expect("external id"),
        Email::new(email).expect("email"),
    )
}

pub fn profile(external_id: Option<&str>, email: &str) -> UserProfile {
    let email = Email::new(email).expect("email");
    UserProfile {
        id: ProfileId::random(),
        external_id: external_id.map(|raw| ExternalId::new(raw).expect("external id")),
        full_name: FullName::from_email(&email),
        email,
        role: ProfileRole::Owner,
        is_active: true,
        avatar_url: None,
        locale: None,
        created_at: fixture_timestamp(),
    }
}

pub fn property(owner: &UserProfile, code: &str, status: PropertyStatus) -> Property {
    let mut property = Property::new_pending(
        ShortCode::parse(code).expect("short code"),
        owner.id,
        PropertyTitle::new("Sunny Loft").expect("title"),
        fixture_timestamp(),
    );
    property.status = status;
    property
}
