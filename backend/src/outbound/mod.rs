//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **auth_provider**: HTTP client for the hosted identity provider
//! - **media**: HTTP client for the object store holding listing media
//! - **memory**: in-process adapters for local development and tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod auth_provider;
pub mod media;
pub mod memory;
pub mod persistence;
