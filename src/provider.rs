//! Upstream-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering the HTTPS-only
//! token endpoint and API base, the client authentication style used for refreshes, and
//! quirks of the recruiting API (authorization scheme, correlation field names).
//! `strategy` defines [`ProviderStrategy`], the hook that decides which upstream failures
//! count as an expired token and how token endpoint rejections map into the relay taxonomy.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
