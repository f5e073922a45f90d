//! Token endpoint call accounting for a [`TokenCache`](crate::auth::TokenCache).
//!
//! Only calls that reach the token endpoint are counted; handing out a cached token is free.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the token endpoint calls made on behalf of one token slot.
#[derive(Debug, Default)]
pub struct TokenEndpointMetrics {
	calls: AtomicU64,
	stored: AtomicU64,
	failed: AtomicU64,
}
impl TokenEndpointMetrics {
	/// Token endpoint calls started.
	pub fn endpoint_calls(&self) -> u64 {
		self.calls.load(Ordering::Relaxed)
	}

	/// Calls whose new access token replaced the slot contents.
	pub fn tokens_stored(&self) -> u64 {
		self.stored.load(Ordering::Relaxed)
	}

	/// Calls that failed and left the slot untouched.
	pub fn endpoint_failures(&self) -> u64 {
		self.failed.load(Ordering::Relaxed)
	}

	pub(crate) fn record_endpoint_call(&self) {
		self.calls.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_token_stored(&self) {
		self.stored.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_endpoint_failure(&self) {
		self.failed.fetch_add(1, Ordering::Relaxed);
	}
}
