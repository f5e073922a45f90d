//! Authorized request plumbing shared by every relay operation.

// crates.io
use reqwest::{
	Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::TokenLease,
	error::{ConfigError, TransportError, UpstreamError},
	http,
	obs::{self, OperationOutcome, RelayOperation},
	provider::{ApiErrorContext, ApiErrorKind},
	relay::{PhotoUpload, Relay},
};

/// Upstream request described as data so it can be sent a second time after a refresh.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// Operation the request belongs to, used for retry accounting.
	pub operation: RelayOperation,
	/// HTTP method.
	pub method: Method,
	/// Fully built API URL, including query parameters.
	pub url: Url,
	/// Request payload.
	pub body: ApiBody,
}
impl ApiRequest {
	/// Creates a request without a body.
	pub fn new(operation: RelayOperation, method: Method, url: Url) -> Self {
		Self { operation, method, url, body: ApiBody::Empty }
	}

	/// `GET` request shorthand.
	pub fn get(operation: RelayOperation, url: Url) -> Self {
		Self::new(operation, Method::GET, url)
	}

	/// Attaches a JSON payload.
	pub fn json(mut self, value: JsonValue) -> Self {
		self.body = ApiBody::Json(value);

		self
	}

	/// Attaches a photo sent as multipart form data.
	pub fn photo(mut self, photo: PhotoUpload) -> Self {
		self.body = ApiBody::Photo(photo);

		self
	}
}

/// Payload variants understood by the API.
#[derive(Clone, Debug)]
pub enum ApiBody {
	/// No payload.
	Empty,
	/// JSON payload.
	Json(JsonValue),
	/// Multipart payload carrying a photo under the `file` field.
	Photo(PhotoUpload),
}

/// Successful upstream response, buffered in full.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body.
	pub body: Bytes,
}
impl ApiResponse {
	/// Decodes the body as JSON; an empty body (e.g. a 204 from search) decodes to `null`.
	pub fn json(&self) -> Result<JsonValue> {
		if self.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(JsonValue::Null);
		}

		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			UpstreamError::ResponseParse { source, status: self.status.as_u16() }.into()
		})
	}

	/// Content type reported by upstream, if any.
	pub fn content_type(&self) -> Option<&str> {
		self.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok())
	}
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
	code: Option<String>,
	message: Option<String>,
	#[serde(default)]
	data: Vec<ApiErrorBody>,
}
impl ApiErrorBody {
	fn into_context(self, status: u16) -> Option<ApiErrorContext> {
		let Self { code, message, data } = self;

		if code.is_none() && message.is_none() {
			return data.into_iter().next().and_then(|nested| nested.into_context(status));
		}

		let mut ctx = ApiErrorContext::new(status);

		if let Some(code) = code {
			ctx = ctx.with_code(code);
		}
		if let Some(message) = message {
			ctx = ctx.with_message(message);
		}

		Some(ctx)
	}
}

impl Relay {
	/// Sends `request` with a bearer token, refreshing and retrying once on token rejection.
	///
	/// The token slot is filled lazily on first use. If the upstream answers with an
	/// expired-token signal, the rejected token is replaced (unless a concurrent caller
	/// already did so) and the request is sent exactly one more time; the second outcome is
	/// returned as-is.
	pub async fn authorized_call(&self, request: &ApiRequest) -> Result<ApiResponse> {
		obs::record_phase("ensure_token");

		let lease = self.tokens().ensure(|| self.mint_access_token()).await?;

		obs::record_phase("dispatch");

		match self.dispatch(request, &lease).await {
			Err(err) if err.is_auth_expired() => {
				let token_age_secs = self
					.tokens()
					.obtained_at()
					.map(|at| (OffsetDateTime::now_utc() - at).whole_seconds());

				tracing::info!(
					operation = %request.operation,
					generation = lease.generation(),
					token_age_secs,
					"access token rejected, refreshing and retrying once"
				);
				obs::record_operation_outcome(request.operation, OperationOutcome::Retry);
				obs::record_phase("refresh");

				let fresh = self.tokens().refresh_stale(&lease, || self.mint_access_token()).await?;

				obs::record_phase("retry");

				self.dispatch(request, &fresh).await
			},
			outcome => outcome,
		}
	}

	async fn dispatch(&self, request: &ApiRequest, lease: &TokenLease) -> Result<ApiResponse> {
		let mut authorization =
			HeaderValue::from_str(&self.descriptor.authorization_value(lease.secret().expose()))
				.map_err(|_| ConfigError::InvalidAuthorizationHeader)?;

		authorization.set_sensitive(true);

		let mut builder = self
			.http_client
			.request(request.method.clone(), request.url.clone())
			.header(AUTHORIZATION, authorization);

		builder = match &request.body {
			ApiBody::Empty => builder,
			ApiBody::Json(value) => builder.json(value),
			ApiBody::Photo(photo) => builder.multipart(photo.to_form()?),
		};

		let response = builder.send().await.map_err(map_send_error)?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let body = response.bytes().await.map_err(TransportError::from)?;

		tracing::debug!(
			method = %request.method,
			path = request.url.path(),
			status = status.as_u16(),
			"upstream responded"
		);

		if status.is_success() {
			return Ok(ApiResponse { status, headers, body });
		}

		Err(self.classify_failure(status, &headers, &body))
	}

	fn classify_failure(&self, status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Error {
		let status = status.as_u16();
		let ctx = serde_json::from_slice::<ApiErrorBody>(body)
			.ok()
			.and_then(|parsed| parsed.into_context(status))
			.unwrap_or_else(|| {
				ApiErrorContext::new(status).with_body_preview(String::from_utf8_lossy(body).trim())
			});

		match self.strategy.classify_api_error(&ctx) {
			ApiErrorKind::AuthExpired => Error::AuthExpired { message: ctx.describe() },
			ApiErrorKind::Failed => UpstreamError::Api {
				status,
				message: ctx.describe(),
				code: ctx.code,
				retry_after: http::parse_retry_after(headers),
			}
			.into(),
		}
	}
}

fn map_send_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		ConfigError::from(err).into()
	} else {
		TransportError::from(err).into()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_body_reads_top_level_then_nested_entry() {
		let top: ApiErrorBody = serde_json::from_str(
			"{\"code\":\"INVALID_TOKEN\",\"details\":{},\"message\":\"invalid oauth token\",\"status\":\"error\"}",
		)
		.expect("Top-level error body should parse.");
		let ctx = top.into_context(401).expect("Top-level error should yield a context.");

		assert_eq!(ctx.code.as_deref(), Some("INVALID_TOKEN"));
		assert_eq!(ctx.describe(), "invalid oauth token");

		let nested: ApiErrorBody = serde_json::from_str(
			"{\"data\":[{\"code\":\"INVALID_DATA\",\"message\":\"invalid data\",\"status\":\"error\"}]}",
		)
		.expect("Nested error body should parse.");
		let ctx = nested.into_context(400).expect("Nested error should yield a context.");

		assert_eq!(ctx.code.as_deref(), Some("INVALID_DATA"));
		assert_eq!(ctx.http_status, 400);
		assert!(ApiErrorBody::default().into_context(500).is_none());
	}

	#[test]
	fn empty_success_body_decodes_to_null() {
		let response = ApiResponse {
			status: StatusCode::NO_CONTENT,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		};

		assert_eq!(response.json().expect("Empty body should decode."), JsonValue::Null);

		let response = ApiResponse {
			status: StatusCode::OK,
			headers: HeaderMap::new(),
			body: Bytes::from_static(b"{\"data\":"),
		};

		assert!(matches!(
			response.json(),
			Err(Error::Upstream(UpstreamError::ResponseParse { status: 200, .. }))
		));
	}
}
