//! Single-slot access-token cache with singleflight refresh and generation-checked rotation.
//!
//! The slot starts [`TokenState::Absent`]. [`TokenCache::ensure`] performs exactly one
//! refresh when the slot is empty and otherwise hands out the cached token untouched.
//! When the upstream rejects a token, callers pass the rejected [`TokenLease`] to
//! [`TokenCache::refresh_stale`]: if the slot still holds that generation a refresh runs,
//! otherwise another task already rotated it and the newer token is returned as-is.
//! A failed refresh leaves the slot unchanged.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{TokenEndpointMetrics, TokenSecret},
};

/// Observable lifecycle state of the slot.
///
/// `PossiblyExpired` is never stored; it only exists between a rejected call and the
/// refresh that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// No token has been minted yet.
	Absent,
	/// A token is cached and presumed valid.
	Valid,
}

/// Snapshot of the cached token handed to a single upstream attempt.
#[derive(Clone, Debug)]
pub struct TokenLease {
	secret: TokenSecret,
	generation: u64,
}
impl TokenLease {
	/// Access token to place in the authorization header.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}

	/// Monotonic counter identifying which refresh produced this token.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

#[derive(Clone, Debug)]
struct CachedToken {
	secret: TokenSecret,
	generation: u64,
	obtained_at: OffsetDateTime,
}
impl CachedToken {
	fn lease(&self) -> TokenLease {
		TokenLease { secret: self.secret.clone(), generation: self.generation }
	}
}

/// Process-wide access-token slot shared by every relay operation.
#[derive(Debug, Default)]
pub struct TokenCache {
	slot: RwLock<Option<CachedToken>>,
	refresh_guard: AsyncMutex<()>,
	generations: AtomicU64,
	metrics: TokenEndpointMetrics,
}
impl TokenCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the current lifecycle state.
	pub fn state(&self) -> TokenState {
		if self.slot.read().is_some() { TokenState::Valid } else { TokenState::Absent }
	}

	/// Returns the cached token, if any, without refreshing.
	pub fn current(&self) -> Option<TokenLease> {
		self.slot.read().as_ref().map(CachedToken::lease)
	}

	/// Returns when the cached token was stored, if any.
	pub fn obtained_at(&self) -> Option<OffsetDateTime> {
		self.slot.read().as_ref().map(|cached| cached.obtained_at)
	}

	/// Counters for token endpoint calls made through this cache.
	pub fn metrics(&self) -> &TokenEndpointMetrics {
		&self.metrics
	}

	/// Stores a token obtained out of band (warm start or tests) and returns its lease.
	pub fn seed(&self, secret: TokenSecret) -> TokenLease {
		self.store(secret)
	}

	/// Returns the cached token, running `refresh` exactly once when the slot is empty.
	///
	/// Concurrent callers that find the slot empty wait on the same refresh instead of
	/// issuing their own.
	pub async fn ensure<F, Fut>(&self, refresh: F) -> Result<TokenLease>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<TokenSecret>>,
	{
		if let Some(lease) = self.current() {
			return Ok(lease);
		}

		let _singleflight = self.refresh_guard.lock().await;

		if let Some(lease) = self.current() {
			return Ok(lease);
		}

		self.run_refresh(refresh).await
	}

	/// Replaces a token the upstream rejected.
	///
	/// Runs `refresh` only if the slot still holds `stale`; a newer generation stored by a
	/// concurrent caller is returned without another token endpoint call.
	pub async fn refresh_stale<F, Fut>(&self, stale: &TokenLease, refresh: F) -> Result<TokenLease>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<TokenSecret>>,
	{
		let _singleflight = self.refresh_guard.lock().await;

		match self.current() {
			Some(current) if current.generation != stale.generation => Ok(current),
			_ => self.run_refresh(refresh).await,
		}
	}

	async fn run_refresh<F, Fut>(&self, refresh: F) -> Result<TokenLease>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<TokenSecret>>,
	{
		self.metrics.record_endpoint_call();

		match refresh().await {
			Ok(secret) => {
				self.metrics.record_token_stored();

				Ok(self.store(secret))
			},
			Err(err) => {
				self.metrics.record_endpoint_failure();

				Err(err)
			},
		}
	}

	fn store(&self, secret: TokenSecret) -> TokenLease {
		let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
		let cached = CachedToken { secret, generation, obtained_at: OffsetDateTime::now_utc() };
		let lease = cached.lease();

		*self.slot.write() = Some(cached);

		lease
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::UpstreamError;

	async fn mint(value: &str) -> Result<TokenSecret> {
		Ok(TokenSecret::new(value))
	}

	async fn fail() -> Result<TokenSecret> {
		Err(UpstreamError::TokenEndpoint {
			message: "boom".into(),
			status: Some(500),
			retry_after: None,
		}
		.into())
	}

	#[tokio::test]
	async fn ensure_refreshes_once_when_absent() {
		let cache = TokenCache::new();

		assert_eq!(cache.state(), TokenState::Absent);

		let lease = cache.ensure(|| mint("first")).await.expect("Refresh should succeed.");

		assert_eq!(lease.secret().expose(), "first");
		assert_eq!(cache.state(), TokenState::Valid);

		let again = cache.ensure(|| mint("second")).await.expect("Cached token should be reused.");

		assert_eq!(again.secret().expose(), "first");
		assert_eq!(cache.metrics().endpoint_calls(), 1);
		assert!(cache.obtained_at().is_some());
	}

	#[tokio::test]
	async fn refresh_stale_rotates_matching_generation() {
		let cache = TokenCache::new();
		let stale = cache.seed(TokenSecret::new("old"));
		let fresh =
			cache.refresh_stale(&stale, || mint("new")).await.expect("Rotation should succeed.");

		assert_eq!(fresh.secret().expose(), "new");
		assert!(fresh.generation() > stale.generation());
		assert_eq!(cache.metrics().tokens_stored(), 1);
	}

	#[tokio::test]
	async fn refresh_stale_adopts_newer_generation_without_calling_endpoint() {
		let cache = TokenCache::new();
		let stale = cache.seed(TokenSecret::new("old"));
		let newer = cache.seed(TokenSecret::new("rotated-elsewhere"));
		let lease = cache
			.refresh_stale(&stale, || mint("unused"))
			.await
			.expect("Newer token should be adopted.");

		assert_eq!(lease.secret().expose(), "rotated-elsewhere");
		assert_eq!(lease.generation(), newer.generation());
		assert_eq!(cache.metrics().endpoint_calls(), 0);
	}

	#[tokio::test]
	async fn failed_refresh_leaves_slot_untouched() {
		let cache = TokenCache::new();
		let stale = cache.seed(TokenSecret::new("kept"));
		let err = cache.refresh_stale(&stale, fail).await.expect_err("Refresh should fail.");

		assert!(matches!(err, Error::Upstream(UpstreamError::TokenEndpoint { .. })));
		assert_eq!(cache.current().map(|lease| lease.generation()), Some(stale.generation()));
		assert_eq!(cache.metrics().endpoint_failures(), 1);
	}

	#[tokio::test]
	async fn concurrent_ensure_is_singleflight() {
		let cache = TokenCache::new();
		let (first, second) =
			tokio::join!(cache.ensure(|| mint("shared")), cache.ensure(|| mint("duplicate")));

		assert_eq!(first.expect("First caller should succeed.").secret().expose(), "shared");
		assert_eq!(second.expect("Second caller should succeed.").secret().expose(), "shared");
		assert_eq!(cache.metrics().endpoint_calls(), 1);
	}
}
