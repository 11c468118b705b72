//! Media store outbound adapters.

mod http_store;

pub use http_store::{HttpMediaStore, MediaStoreEndpoint};
