//! Provider descriptor data structures shared by the token refresher and relay operations.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Default Zoho accounts token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://accounts.zoho.com/oauth/v2/token";
/// Default Zoho Recruit v2 API base.
pub const DEFAULT_API_BASE: &str = "https://recruit.zoho.com/recruit/v2";

/// Client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}
impl ClientAuthMethod {
	/// Returns the RFC 7591 name of the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientAuthMethod::ClientSecretBasic => "client_secret_basic",
			ClientAuthMethod::ClientSecretPost => "client_secret_post",
		}
	}
}
impl Display for ClientAuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ClientAuthMethod {
	type Err = ProviderDescriptorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"client_secret_basic" => Ok(ClientAuthMethod::ClientSecretBasic),
			"client_secret_post" => Ok(ClientAuthMethod::ClientSecretPost),
			other => Err(ProviderDescriptorError::UnknownClientAuthMethod { value: other.into() }),
		}
	}
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// OAuth token endpoint used for refresh-token grants.
	pub token: Url,
	/// Root of the REST API; operation paths are appended to it.
	pub api_base: Url,
}

/// Immutable provider descriptor consumed by the relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Client authentication mechanism for refreshes.
	pub client_auth_method: ClientAuthMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder with no endpoints set.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}

	/// Builds an API URL by appending path segments to the API base.
	///
	/// Segments are percent-encoded individually, so identifiers can never introduce
	/// additional path components.
	pub fn api_url<'a, I>(&self, segments: I) -> Result<Url, ConfigError>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut url = self.endpoints.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidApiBase { url: self.endpoints.api_base.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	/// Formats the `Authorization` header value for an access token.
	pub fn authorization_value(&self, access_token: &str) -> String {
		format!("{} {access_token}", self.quirks.authorization_scheme)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor(api_base: &str) -> ProviderDescriptor {
		ProviderDescriptor::builder()
			.token_endpoint(
				Url::parse(DEFAULT_TOKEN_ENDPOINT).expect("Default token endpoint should parse."),
			)
			.api_base(Url::parse(api_base).expect("API base fixture should parse."))
			.build()
			.expect("Descriptor fixture should build.")
	}

	#[test]
	fn api_url_appends_segments_to_base() {
		let descriptor = descriptor(DEFAULT_API_BASE);
		let url = descriptor
			.api_url(["Candidates", "598012000000123", "photo"])
			.expect("API URL should build.");

		assert_eq!(url.as_str(), "https://recruit.zoho.com/recruit/v2/Candidates/598012000000123/photo");
	}

	#[test]
	fn api_url_tolerates_trailing_slash_and_encodes_segments() {
		let descriptor = descriptor("https://recruit.zoho.eu/recruit/v2/");
		let url = descriptor.api_url(["Candidates", "a/b"]).expect("API URL should build.");

		assert_eq!(url.as_str(), "https://recruit.zoho.eu/recruit/v2/Candidates/a%2Fb");
	}

	#[test]
	fn authorization_value_uses_scheme_quirk() {
		let descriptor = descriptor(DEFAULT_API_BASE);

		assert_eq!(descriptor.authorization_value("abc"), "Zoho-oauthtoken abc");
	}

	#[test]
	fn client_auth_method_parses_registered_names() {
		for method in [ClientAuthMethod::ClientSecretBasic, ClientAuthMethod::ClientSecretPost] {
			assert_eq!(method.as_str().parse::<ClientAuthMethod>(), Ok(method));
		}

		assert_eq!(
			"private_key_jwt".parse::<ClientAuthMethod>(),
			Err(ProviderDescriptorError::UnknownClientAuthMethod { value: "private_key_jwt".into() })
		);
	}
}
