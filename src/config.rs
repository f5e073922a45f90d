//! Process configuration sourced from command-line flags and environment variables.

// std
use std::net::SocketAddr;
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	api::DEFAULT_MAX_UPLOAD_BYTES,
	auth::TokenSecret,
	error::ConfigError,
	obs::DEFAULT_LOG_FILTER,
	provider::{
		ClientAuthMethod, DEFAULT_API_BASE, DEFAULT_AUTHORIZATION_SCHEME,
		DEFAULT_CANDIDATE_CORRELATION_FIELD, DEFAULT_JOB_OPENING_CORRELATION_FIELD,
		DEFAULT_TOKEN_ENDPOINT, ProviderDescriptor, ProviderQuirks,
	},
	relay::{Relay, RelayCredentials},
};

/// Relay settings; every flag can also be supplied through the listed environment variable.
#[derive(Clone, Debug, Parser)]
#[command(name = "recruit-relay", version, about, long_about = None)]
pub struct RelayConfig {
	/// Address the HTTP server listens on.
	#[arg(long, env = "RELAY_BIND", default_value = "0.0.0.0:3000")]
	pub bind: SocketAddr,
	/// OAuth client identifier.
	#[arg(long, env = "ZOHO_CLIENT_ID")]
	pub client_id: String,
	/// OAuth client secret.
	#[arg(long, env = "ZOHO_CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: TokenSecret,
	/// Long-lived refresh token exchanged for access tokens.
	#[arg(long, env = "ZOHO_REFRESH_TOKEN", hide_env_values = true)]
	pub refresh_token: TokenSecret,
	/// OAuth token endpoint.
	#[arg(long, env = "ZOHO_TOKEN_URL", default_value = DEFAULT_TOKEN_ENDPOINT)]
	pub token_url: Url,
	/// Base URL of the recruiting REST API.
	#[arg(long, env = "ZOHO_API_BASE", default_value = DEFAULT_API_BASE)]
	pub api_base: Url,
	/// How client credentials reach the token endpoint: `client_secret_post` or
	/// `client_secret_basic`.
	#[arg(
		long,
		env = "ZOHO_CLIENT_AUTH_METHOD",
		default_value_t = ClientAuthMethod::ClientSecretPost
	)]
	pub client_auth_method: ClientAuthMethod,
	/// Scheme placed before the access token in the `Authorization` header.
	#[arg(long, env = "ZOHO_AUTH_SCHEME", default_value = DEFAULT_AUTHORIZATION_SCHEME)]
	pub auth_scheme: String,
	/// Custom candidate field holding the job-board candidate id.
	#[arg(
		long,
		env = "ZOHO_CANDIDATE_CORRELATION_FIELD",
		default_value = DEFAULT_CANDIDATE_CORRELATION_FIELD
	)]
	pub candidate_correlation_field: String,
	/// Custom job opening field holding the job-board opening id.
	#[arg(
		long,
		env = "ZOHO_JOB_OPENING_CORRELATION_FIELD",
		default_value = DEFAULT_JOB_OPENING_CORRELATION_FIELD
	)]
	pub job_opening_correlation_field: String,
	/// Per-request timeout for upstream calls, in seconds.
	#[arg(long, env = "RELAY_REQUEST_TIMEOUT_SECS")]
	pub request_timeout_secs: Option<u64>,
	/// Maximum accepted inbound body size, in bytes.
	#[arg(long, env = "RELAY_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
	pub max_upload_bytes: usize,
	/// `tracing` filter directives.
	#[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
	pub log_filter: String,
}
impl RelayConfig {
	/// Validated provider descriptor built from the endpoint and quirk settings.
	pub fn descriptor(&self) -> Result<ProviderDescriptor, ConfigError> {
		let quirks = ProviderQuirks {
			authorization_scheme: self.auth_scheme.clone(),
			candidate_correlation_field: self.candidate_correlation_field.clone(),
			job_opening_correlation_field: self.job_opening_correlation_field.clone(),
		};

		Ok(ProviderDescriptor::builder()
			.token_endpoint(self.token_url.clone())
			.api_base(self.api_base.clone())
			.client_auth_method(self.client_auth_method)
			.quirks(quirks)
			.build()?)
	}

	/// Client credentials, rejecting blank values.
	pub fn credentials(&self) -> Result<RelayCredentials, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingCredential { name: "client id" });
		}
		if self.client_secret.is_blank() {
			return Err(ConfigError::MissingCredential { name: "client secret" });
		}
		if self.refresh_token.is_blank() {
			return Err(ConfigError::MissingCredential { name: "refresh token" });
		}

		Ok(RelayCredentials::new(
			self.client_id.trim(),
			self.client_secret.clone(),
			self.refresh_token.clone(),
		))
	}

	/// Upstream request timeout, if configured.
	pub fn request_timeout(&self) -> Option<std::time::Duration> {
		self.request_timeout_secs.map(std::time::Duration::from_secs)
	}

	/// Builds the relay described by this configuration.
	pub fn relay(&self) -> Result<Relay> {
		Relay::new(self.descriptor()?, self.credentials()?, self.request_timeout())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn parse(extra: &[&str]) -> Result<RelayConfig, clap::Error> {
		let base = [
			"recruit-relay",
			"--client-id",
			"client",
			"--client-secret",
			"secret",
			"--refresh-token",
			"refresh",
		];

		RelayConfig::try_parse_from(base.iter().chain(extra))
	}

	#[test]
	fn defaults_target_zoho() {
		let config = parse(&[
			"--token-url",
			DEFAULT_TOKEN_ENDPOINT,
			"--api-base",
			DEFAULT_API_BASE,
			"--auth-scheme",
			DEFAULT_AUTHORIZATION_SCHEME,
		])
		.expect("Config with credentials should parse.");
		let descriptor = config.descriptor().expect("Default descriptor should build.");

		assert_eq!(descriptor.endpoints.token.as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert_eq!(descriptor.authorization_value("abc"), "Zoho-oauthtoken abc");
		assert_eq!(config.credentials().expect("Credentials should be valid.").client_id, "client");
		assert!(config.relay().is_ok());
	}

	#[test]
	fn insecure_endpoints_and_blank_credentials_are_rejected() {
		let config = parse(&["--token-url", "http://accounts.example.com/oauth/v2/token"])
			.expect("Config should parse before validation.");

		assert!(matches!(config.descriptor(), Err(ConfigError::Descriptor(_))));

		let mut config = parse(&[]).expect("Config should parse.");

		config.refresh_token = TokenSecret::new("  ");

		assert!(matches!(
			config.credentials(),
			Err(ConfigError::MissingCredential { name: "refresh token" })
		));
	}

	#[test]
	fn timeout_and_upload_limit_are_configurable() {
		let config = parse(&["--request-timeout-secs", "15", "--max-upload-bytes", "1024"])
			.expect("Config with limits should parse.");

		assert_eq!(config.request_timeout(), Some(std::time::Duration::from_secs(15)));
		assert_eq!(config.max_upload_bytes, 1024);
	}

	#[test]
	fn client_auth_method_selects_basic_auth() {
		let config = parse(&[]).expect("Config should parse.");

		assert_eq!(
			config.descriptor().expect("Default descriptor should build.").client_auth_method,
			ClientAuthMethod::ClientSecretPost
		);

		let config = parse(&["--client-auth-method", "client_secret_basic"])
			.expect("Config with basic auth should parse.");

		assert_eq!(
			config.descriptor().expect("Basic auth descriptor should build.").client_auth_method,
			ClientAuthMethod::ClientSecretBasic
		);
		assert!(parse(&["--client-auth-method", "bearer"]).is_err());
	}
}
