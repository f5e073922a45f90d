//! Access-token storage: the single-slot cache, its refresh counters, and the redacted secret.

pub mod cache;
pub mod metrics;
pub mod secret;
