// self
use crate::{
	_prelude::*,
	provider::{
		ClientAuthMethod, DEFAULT_API_BASE, DEFAULT_TOKEN_ENDPOINT, ProviderDescriptor,
		ProviderEndpoints, ProviderQuirks,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// API base is mandatory.
	#[error("Missing API base.")]
	MissingApiBase,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The API base must accept appended path segments.
	#[error("The API base cannot carry path segments: {url}.")]
	OpaqueApiBase {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Header scheme must be a single non-empty token.
	#[error("Authorization scheme must be a non-empty token without whitespace.")]
	InvalidAuthorizationScheme,
	/// Correlation field names must be non-empty.
	#[error("The {field} correlation field name cannot be empty.")]
	EmptyCorrelationField {
		/// Which correlation field failed validation.
		field: &'static str,
	},
	/// Client authentication method name is not recognized.
	#[error("Unknown client authentication method `{value}`.")]
	UnknownClientAuthMethod {
		/// Rejected method name.
		value: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// OAuth token endpoint.
	pub token_endpoint: Option<Url>,
	/// REST API base.
	pub api_base: Option<Url>,
	/// Client authentication method for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a builder seeded with the public Zoho endpoints.
	pub fn zoho() -> Self {
		let builder = Self::new();

		match (Url::parse(DEFAULT_TOKEN_ENDPOINT), Url::parse(DEFAULT_API_BASE)) {
			(Ok(token), Ok(api_base)) => builder.token_endpoint(token).api_base(api_base),
			_ => builder,
		}
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the REST API base.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the client authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let api_base = self.api_base.ok_or(ProviderDescriptorError::MissingApiBase)?;
		let descriptor = ProviderDescriptor {
			endpoints: ProviderEndpoints { token, api_base },
			client_auth_method: self.client_auth_method,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("api", &self.endpoints.api_base)?;

		if self.endpoints.api_base.cannot_be_a_base() {
			return Err(ProviderDescriptorError::OpaqueApiBase {
				url: self.endpoints.api_base.to_string(),
			});
		}

		let scheme = &self.quirks.authorization_scheme;

		if scheme.is_empty() || !scheme.chars().all(|ch| ch.is_ascii_graphic()) {
			return Err(ProviderDescriptorError::InvalidAuthorizationScheme);
		}

		validate_field("candidate", &self.quirks.candidate_correlation_field)?;
		validate_field("job opening", &self.quirks.job_opening_correlation_field)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

fn validate_field(name: &'static str, value: &str) -> Result<(), ProviderDescriptorError> {
	if value.trim().is_empty() {
		Err(ProviderDescriptorError::EmptyCorrelationField { field: name })
	} else {
		Ok(())
	}
}
