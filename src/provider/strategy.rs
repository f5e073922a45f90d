//! Provider strategy hooks that classify upstream failures.
//!
//! Implementations decide which API failures count as an expired access token (the only
//! signal that earns a refresh-and-retry) and how token endpoint rejections map into the
//! relay error taxonomy, without tying the relay to any particular HTTP client.

// self
use crate::_prelude::*;

/// Error code Zoho returns alongside HTTP 401 when an access token is stale or revoked.
pub const INVALID_TOKEN_CODE: &str = "INVALID_TOKEN";

/// Strategy hook that allows providers to classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data
/// types so downstream crates never depend on reqwest-specific structures.
pub trait ProviderStrategy: Send + Sync {
	/// Decides whether an API failure should trigger the single refresh-and-retry.
	fn classify_api_error(&self, ctx: &ApiErrorContext) -> ApiErrorKind;

	/// Maps token endpoint failures into the relay taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;
}

/// Classification of a failed API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
	/// Access token was rejected; refresh and retry once.
	AuthExpired,
	/// Any other failure; surface without retry.
	Failed,
}

/// Canonical token endpoint error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the refresh token.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Failure is temporary or unrecognized.
	Transient,
}

/// Context passed to strategies when classifying a failed API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiErrorContext {
	/// HTTP status code returned by the API.
	pub http_status: u16,
	/// Provider error code from the response body (e.g. `INVALID_TOKEN`).
	pub code: Option<String>,
	/// Provider error message from the response body.
	pub message: Option<String>,
	/// Preview of the response body for payloads without a structured error.
	pub body_preview: Option<String>,
}
impl ApiErrorContext {
	/// Creates a new context for the provided status.
	pub fn new(http_status: u16) -> Self {
		Self { http_status, code: None, message: None, body_preview: None }
	}

	/// Adds the provider error code.
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());

		self
	}

	/// Adds the provider error message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());

		self
	}

	/// Adds a body preview, truncated to a log-friendly length.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}

	/// Best available human-readable description of the failure.
	pub fn describe(&self) -> String {
		self.message
			.clone()
			.or_else(|| self.body_preview.clone().filter(|preview| !preview.is_empty()))
			.or_else(|| self.code.clone())
			.unwrap_or_else(|| format!("HTTP {}", self.http_status))
	}
}

/// Context passed to provider strategies when classifying token endpoint errors.
///
/// The struct keeps only primitive data (status codes, OAuth fields, body preview) so
/// strategies stay decoupled from any HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
	/// Indicates whether the failure originated from the network/transport layer.
	pub network_error: bool,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates an empty context.
	pub fn new() -> Self {
		Self {
			http_status: None,
			oauth_error: None,
			error_description: None,
			body_preview: None,
			network_error: false,
		}
	}

	/// Convenience constructor for transport-level/network failures.
	pub fn network_failure() -> Self {
		let mut ctx = Self::new();

		ctx.network_error = true;

		ctx
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a body preview for providers that return non-JSON payloads.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}
impl Default for ProviderErrorContext {
	fn default() -> Self {
		Self::new()
	}
}

/// Default strategy for Zoho Recruit.
///
/// An API failure is an expired token only when the status is 401 *and* the body carries
/// the `INVALID_TOKEN` code; every other combination is surfaced as-is. Token endpoint
/// failures prefer structured OAuth fields, then body text hints, then the HTTP status.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_api_error(&self, ctx: &ApiErrorContext) -> ApiErrorKind {
		let invalid_token =
			ctx.code.as_deref().is_some_and(|code| code.eq_ignore_ascii_case(INVALID_TOKEN_CODE));

		if ctx.http_status == 401 && invalid_token {
			ApiErrorKind::AuthExpired
		} else {
			ApiErrorKind::Failed
		}
	}

	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.network_error {
			return ProviderErrorKind::Transient;
		}

		if let Some(kind) =
			classify_oauth_error(ctx.oauth_error.as_deref(), ctx.error_description.as_deref())
		{
			return kind;
		}
		if let Some(kind) = classify_body(ctx.body_preview.as_deref()) {
			return kind;
		}

		classify_status(ctx.http_status)
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ProviderErrorContext::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

fn classify_oauth_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
) -> Option<ProviderErrorKind> {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_body(error_description))
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	// Zoho answers a bad refresh token with `invalid_code`.
	if value.eq_ignore_ascii_case("invalid_grant")
		|| value.eq_ignore_ascii_case("invalid_code")
		|| value.eq_ignore_ascii_case("access_denied")
	{
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_body(body: Option<&str>) -> Option<ProviderErrorKind> {
	let body = body?;
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") || text.contains("invalid_code") =>
			Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ProviderErrorKind::InvalidClient),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		_ => ProviderErrorKind::Transient,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_401_with_invalid_token_code_is_auth_expired() {
		let strategy = DefaultProviderStrategy;
		let expired = ApiErrorContext::new(401).with_code("INVALID_TOKEN");

		assert_eq!(strategy.classify_api_error(&expired), ApiErrorKind::AuthExpired);

		let other_code = ApiErrorContext::new(401).with_code("OAUTH_SCOPE_MISMATCH");

		assert_eq!(strategy.classify_api_error(&other_code), ApiErrorKind::Failed);

		let no_code = ApiErrorContext::new(401).with_body_preview("Unauthorized");

		assert_eq!(strategy.classify_api_error(&no_code), ApiErrorKind::Failed);

		let wrong_status = ApiErrorContext::new(400).with_code("INVALID_TOKEN");

		assert_eq!(strategy.classify_api_error(&wrong_status), ApiErrorKind::Failed);
	}

	#[test]
	fn describe_prefers_message_then_preview() {
		let ctx = ApiErrorContext::new(400).with_code("INVALID_DATA").with_message("invalid data");

		assert_eq!(ctx.describe(), "invalid data");

		let ctx = ApiErrorContext::new(502).with_body_preview("Bad Gateway");

		assert_eq!(ctx.describe(), "Bad Gateway");
		assert_eq!(ApiErrorContext::new(503).describe(), "HTTP 503");
	}

	#[test]
	fn body_preview_is_truncated() {
		let ctx = ApiErrorContext::new(500).with_body_preview("x".repeat(1_000));
		let preview = ctx.body_preview.expect("Preview should be recorded.");

		assert_eq!(preview.chars().count(), ProviderErrorContext::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}

	#[test]
	fn token_errors_prefer_oauth_fields() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::new().with_http_status(200).with_oauth_error("invalid_code");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx =
			ProviderErrorContext::new().with_http_status(401).with_oauth_error("invalid_client");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidClient);
	}

	#[test]
	fn token_errors_fall_back_to_body_and_status() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::new().with_body_preview("error=invalid_client");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidClient);

		let ctx = ProviderErrorContext::new().with_http_status(503);

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::Transient);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::network_failure()),
			ProviderErrorKind::Transient
		);
	}
}
