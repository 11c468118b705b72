//! In-memory adapters for local development and tests.
//!
//! Each adapter honours the same contract as its PostgreSQL counterpart:
//! unique keys are enforced, status updates are compare-and-swap and the
//! audit log is append-only. Clones share state. Every operation yields to
//! the scheduler once before touching state so that concurrent requests
//! interleave the way they would around real I/O.

mod media;
mod profiles;
mod properties;

use std::sync::{Mutex, MutexGuard};

pub use media::InMemoryMediaStore;
pub use profiles::InMemoryUserProfileRepository;
pub use properties::{InMemoryPropertyRepository, InMemoryStatusTransitionRepository};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, String> {
    mutex
        .lock()
        .map_err(|_| "in-memory store lock poisoned".to_owned())
}
