//! Cache-control policies for HTTP handlers.

/// Caller-specific responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

/// Probe responses must never be cached.
pub const NO_STORE: &str = "no-store";

/// Header tuple for responses that depend on the caller.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE)
}

/// Header tuple for liveness and readiness probes.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
