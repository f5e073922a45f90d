//! Job opening operations.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	error::ClientInputError,
	obs::RelayOperation,
	relay::{ApiRequest, FieldMap, Relay, equals_criteria, input::non_blank},
};

const JOB_OPENINGS: &str = "Job_Openings";

impl Relay {
	/// Creates a job opening record from `fields`.
	pub async fn create_job_opening(&self, fields: FieldMap) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::CreateJobOpening;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([JOB_OPENINGS])?;
			let request = ApiRequest::new(OPERATION, Method::POST, url).json(fields.into_envelope());

			self.authorized_call(&request).await?.json()
		})
		.await
	}

	/// Searches job openings by the configured correlation field; `null` when nothing matched.
	pub async fn fetch_job_opening(&self, correlation_id: &str) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::FetchJobOpening;

		self.observe(OPERATION, async {
			let correlation_id = non_blank(Some(correlation_id.to_owned()))
				.ok_or(ClientInputError::missing("computrabajo_oi"))?;
			let criteria =
				equals_criteria(&self.descriptor.quirks.job_opening_correlation_field, &correlation_id);
			let mut url = self.descriptor.api_url([JOB_OPENINGS, "search"])?;

			url.query_pairs_mut().append_pair("criteria", &criteria);

			self.authorized_call(&ApiRequest::get(OPERATION, url)).await?.json()
		})
		.await
	}
}
