//! Refresh-token grant against the provider's OAuth token endpoint.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransportError, UpstreamError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{
		ClientAuthMethod, ProviderDescriptor, ProviderErrorContext, ProviderErrorKind,
		ProviderStrategy,
	},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Access token minted by a refresh, plus the lifetime the provider advertised.
#[derive(Clone, Debug)]
pub struct RefreshedToken {
	/// New access token.
	pub access_token: TokenSecret,
	/// Advertised lifetime; informational only, the relay never expires tokens locally.
	pub expires_in: Option<Duration>,
}

/// Facade over the `oauth2` crate for the `grant_type=refresh_token` exchange.
pub(crate) struct RefreshFacade {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
}
impl RefreshFacade {
	pub(crate) fn from_descriptor(
		descriptor: &ProviderDescriptor,
		client_id: &str,
		client_secret: &TokenSecret,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let token_url = TokenUrl::new(descriptor.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_client_secret(ClientSecret::new(client_secret.expose().to_owned()))
			.set_token_uri(token_url);

		if matches!(descriptor.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self { oauth_client, http_client })
	}

	/// Exchanges the long-lived refresh token for a new access token.
	pub(crate) async fn refresh_token(
		&self,
		strategy: &dyn ProviderStrategy,
		refresh_token: &TokenSecret,
	) -> Result<RefreshedToken> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(strategy, meta.take(), err))?;
		let expires_in = response
			.expires_in()
			.and_then(|lifetime| i64::try_from(lifetime.as_secs()).ok())
			.map(Duration::seconds);

		Ok(RefreshedToken {
			access_token: TokenSecret::new(response.access_token().secret().to_owned()),
			expires_in,
		})
	}
}

fn map_request_error(
	strategy: &dyn ProviderStrategy,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(strategy, response, meta_ref),
		RequestTokenError::Request(error) => map_transport_error(meta_ref, error),
		RequestTokenError::Parse(error, body) => {
			// Zoho reports grant failures with HTTP 200 and an OAuth error body.
			match serde_json::from_slice::<BasicErrorResponse>(&body) {
				Ok(response) => map_server_response_error(strategy, response, meta_ref),
				Err(_) => match meta_status(meta_ref) {
					Some(status) if !(200..300).contains(&status) =>
						map_unstructured_failure(strategy, status, &body, meta_ref),
					status => UpstreamError::TokenResponseParse { source: error, status }.into(),
				},
			}
		},
		RequestTokenError::Other(message) => UpstreamError::TokenEndpoint {
			message,
			status: meta_status(meta_ref),
			retry_after: meta_retry_after(meta_ref),
		}
		.into(),
	}
}

fn map_server_response_error(
	strategy: &dyn ProviderStrategy,
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx = ProviderErrorContext::new().with_oauth_error(response.error().as_ref());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	let message = if let Some(description) = response.error_description() {
		format!("Token endpoint returned an OAuth error: {description}")
	} else {
		format!("Token endpoint returned an OAuth error: {}", response.error().as_ref())
	};

	classify_token_failure(strategy, &ctx, message, meta)
}

// Non-2xx replies without an OAuth error body, e.g. an HTML or plain-text 500.
fn map_unstructured_failure(
	strategy: &dyn ProviderStrategy,
	status: u16,
	body: &[u8],
	meta: Option<&ResponseMetadata>,
) -> Error {
	let ctx = ProviderErrorContext::new()
		.with_http_status(status)
		.with_body_preview(String::from_utf8_lossy(body).trim());
	let message = match ctx.body_preview.as_deref() {
		Some(preview) if !preview.is_empty() => format!("HTTP {status}: {preview}"),
		_ => format!("HTTP {status} with an empty body"),
	};

	classify_token_failure(strategy, &ctx, message, meta)
}

fn classify_token_failure(
	strategy: &dyn ProviderStrategy,
	ctx: &ProviderErrorContext,
	message: String,
	meta: Option<&ResponseMetadata>,
) -> Error {
	match strategy.classify_token_error(ctx) {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
		ProviderErrorKind::Transient => UpstreamError::TokenEndpoint {
			message,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn map_transport_error(meta: Option<&ResponseMetadata>, err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => UpstreamError::TokenEndpoint {
			message: format!("HTTP client error occurred while calling the token endpoint: {message}"),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
		_ => UpstreamError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return UpstreamError::TokenEndpoint {
			message: "Request timed out while calling the token endpoint".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::from(err).into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
