//! The relay service: one shared token slot and the operations that forward to the API.
//!
//! Every operation follows the same contract, implemented once in
//! [`Relay::authorized_call`]: make sure a token exists (refreshing at most once when the
//! slot is empty), send the request, and when the upstream rejects the token, refresh it and
//! retry exactly once. Any other failure is surfaced untouched.

pub mod applications;
pub mod call;
pub mod candidates;
pub mod input;
pub mod job_openings;

pub use call::*;
pub use candidates::*;
pub use input::*;

// self
use crate::{
	_prelude::*,
	auth::{TokenCache, TokenSecret},
	http::ReqwestHttpClient,
	oauth::RefreshFacade,
	obs::{self, OperationOutcome, OperationSpan, RelayOperation},
	provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderStrategy},
};

/// Fixed OAuth client credentials exchanged for access tokens.
#[derive(Clone, Debug)]
pub struct RelayCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Long-lived refresh token.
	pub refresh_token: TokenSecret,
}
impl RelayCredentials {
	/// Bundles the client id/secret/refresh-token triple.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: TokenSecret,
		refresh_token: TokenSecret,
	) -> Self {
		Self { client_id: client_id.into(), client_secret, refresh_token }
	}
}

/// Relays requests to the recruiting API with lazily refreshed credentials.
///
/// Cloning is cheap; clones share the same token slot, descriptor, and HTTP client.
#[derive(Clone)]
pub struct Relay {
	/// HTTP client used for both the token endpoint and the API.
	pub http_client: ReqwestHttpClient,
	/// Upstream endpoints and quirks.
	pub descriptor: Arc<ProviderDescriptor>,
	/// Strategy deciding which failures earn a refresh-and-retry.
	pub strategy: Arc<dyn ProviderStrategy>,
	credentials: Arc<RelayCredentials>,
	tokens: Arc<TokenCache>,
}
impl Relay {
	/// Creates a relay with the default strategy and a redirect-free reqwest client.
	pub fn new(
		descriptor: ProviderDescriptor,
		credentials: RelayCredentials,
		timeout: Option<std::time::Duration>,
	) -> Result<Self> {
		let http_client = ReqwestHttpClient::build(timeout)?;

		Ok(Self::with_http_client(
			descriptor,
			credentials,
			Arc::new(DefaultProviderStrategy),
			http_client,
		))
	}

	/// Creates a relay that reuses the caller-provided transport and strategy.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		credentials: RelayCredentials,
		strategy: Arc<dyn ProviderStrategy>,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self {
			http_client,
			descriptor: Arc::new(descriptor),
			strategy,
			credentials: Arc::new(credentials),
			tokens: Default::default(),
		}
	}

	/// Shared access-token slot.
	pub fn tokens(&self) -> &TokenCache {
		&self.tokens
	}

	/// Calls the token endpoint once and returns the new access token without storing it.
	///
	/// [`TokenCache`] decides when this runs; callers normally go through
	/// [`Relay::authorized_call`].
	pub async fn mint_access_token(&self) -> Result<TokenSecret> {
		self.observe(RelayOperation::RefreshToken, async {
			let facade = RefreshFacade::from_descriptor(
				&self.descriptor,
				&self.credentials.client_id,
				&self.credentials.client_secret,
				self.http_client.clone(),
			)?;
			let refreshed = facade
				.refresh_token(self.strategy.as_ref(), &self.credentials.refresh_token)
				.await?;

			tracing::info!(
				expires_in_secs = refreshed.expires_in.map(|lifetime| lifetime.whole_seconds()),
				"obtained new access token"
			);

			Ok(refreshed.access_token)
		})
		.await
	}

	async fn observe<T, Fut>(&self, operation: RelayOperation, fut: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		let span = OperationSpan::new(operation);

		obs::record_operation_outcome(operation, OperationOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(operation, OperationOutcome::Success),
			Err(err) => {
				if err.is_client_input() {
					tracing::debug!(%operation, error = %err, "rejected invalid input");
				} else {
					tracing::warn!(%operation, error = %err, "operation failed");
				}

				obs::record_operation_outcome(operation, OperationOutcome::Failure);
			},
		}

		result
	}
}
impl Debug for Relay {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Relay")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.credentials.client_id)
			.field("token_state", &self.tokens.state())
			.finish()
	}
}
