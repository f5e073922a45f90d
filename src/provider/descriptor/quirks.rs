// self
use crate::_prelude::*;

/// Default `Authorization` scheme expected by Zoho APIs.
pub const DEFAULT_AUTHORIZATION_SCHEME: &str = "Zoho-oauthtoken";
/// Default custom field holding the job-board candidate identifier.
pub const DEFAULT_CANDIDATE_CORRELATION_FIELD: &str = "Computrabajo_Candidate_ID";
/// Default custom field holding the job-board opening identifier.
pub const DEFAULT_JOB_OPENING_CORRELATION_FIELD: &str = "Computrabajo_OI";

/// Provider-specific quirks that influence how requests are built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Scheme placed before the access token in the `Authorization` header.
	pub authorization_scheme: String,
	/// API name of the candidate field searched by correlation id.
	pub candidate_correlation_field: String,
	/// API name of the job opening field searched by correlation id.
	pub job_opening_correlation_field: String,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			authorization_scheme: DEFAULT_AUTHORIZATION_SCHEME.into(),
			candidate_correlation_field: DEFAULT_CANDIDATE_CORRELATION_FIELD.into(),
			job_opening_correlation_field: DEFAULT_JOB_OPENING_CORRELATION_FIELD.into(),
		}
	}
}
