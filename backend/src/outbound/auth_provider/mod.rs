//! Identity provider outbound adapters.
//!
//! A thin HTTP implementation of the `AuthProvider` port against the hosted
//! provider's user endpoint.

mod dto;
mod http_provider;

pub use http_provider::HttpAuthProvider;
