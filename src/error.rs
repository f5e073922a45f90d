//! Relay-level error types shared across the token cache, upstream calls, and the HTTP surface.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller supplied missing or invalid input.
	#[error(transparent)]
	ClientInput(#[from] ClientInputError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream answered with a failure or an unusable payload.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Upstream rejected the access token as invalid or expired.
	#[error("Access token was rejected by the upstream API: {message}.")]
	AuthExpired {
		/// Upstream-supplied message.
		message: String,
	},
	/// Token endpoint rejected the refresh token.
	#[error("Token endpoint rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or relay-supplied reason string.
		reason: String,
	},
	/// Token endpoint rejected the client credentials.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or relay-supplied reason string.
		reason: String,
	},
}
impl Error {
	/// Returns true when the error should trigger the single refresh-and-retry.
	pub fn is_auth_expired(&self) -> bool {
		matches!(self, Self::AuthExpired { .. })
	}

	/// Returns true when the caller, not the upstream, is at fault.
	pub fn is_client_input(&self) -> bool {
		matches!(self, Self::ClientInput(_))
	}
}

/// Input validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ClientInputError {
	/// A required parameter was not supplied.
	#[error("The `{field}` parameter is required.")]
	MissingField {
		/// Parameter name as seen by the caller.
		field: &'static str,
	},
	/// A parameter was supplied with an unusable value.
	#[error("The `{field}` parameter is invalid: {reason}.")]
	InvalidField {
		/// Parameter name as seen by the caller.
		field: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
	/// A record identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
	/// The request body could not be decoded.
	#[error("Request body could not be decoded: {message}.")]
	MalformedBody {
		/// Decoder-supplied message.
		message: String,
	},
}
impl ClientInputError {
	/// Shorthand for [`ClientInputError::MissingField`].
	pub fn missing(field: &'static str) -> Self {
		Self::MissingField { field }
	}

	/// Shorthand for [`ClientInputError::InvalidField`].
	pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidField { field, reason: reason.into() }
	}
}

/// Configuration and construction failures raised by the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Descriptor contains an invalid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidDescriptor {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// API base cannot carry path segments.
	#[error("API base `{url}` cannot be used as a base URL.")]
	InvalidApiBase {
		/// Offending URL.
		url: String,
	},
	/// Descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Authorization header could not be encoded.
	#[error("Authorization header value is not valid ASCII.")]
	InvalidAuthorizationHeader,
	/// A required credential was blank.
	#[error("The {name} credential must not be empty.")]
	MissingCredential {
		/// Credential name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Non-success or unusable responses from the token endpoint or the API.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// API returned a non-success status.
	#[error("Upstream API returned HTTP {status}: {message}.")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Upstream error code (e.g. `INVALID_DATA`), when available.
		code: Option<String>,
		/// Upstream message or a preview of the raw body.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or relay-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// API responded with a body that is not valid JSON.
	#[error("Upstream API returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Photo download returned something other than an image.
	#[error("Upstream returned non-image content: {content_type}.")]
	NotAnImage {
		/// Content type reported by upstream.
		content_type: String,
	},
	/// Photo download returned an empty body.
	#[error("Upstream returned an empty photo.")]
	EmptyPhoto,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
