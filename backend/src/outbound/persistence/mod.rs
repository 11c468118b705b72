//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL
//! through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Bounded calls**: checkout and every query run under a timeout; a
//!   timeout is reported as a connection error so the domain treats it as
//!   retryable.
//!
//! # Example
//!
//! ```ignore
//! use listings::outbound::persistence::{DbPool, DieselPropertyRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/listings")).await?;
//! let repo = DieselPropertyRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_property_repository;
mod diesel_status_transition_repository;
mod diesel_user_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_property_repository::DieselPropertyRepository;
pub use diesel_status_transition_repository::DieselStatusTransitionRepository;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
