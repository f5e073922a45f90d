//! Candidate operations: lookup, create/update, photo transfer, associations, related
//! applications.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	auth::{CandidateId, JobOpeningId},
	error::{ClientInputError, UpstreamError},
	obs::RelayOperation,
	relay::{
		ApiRequest, CandidateLookup, FieldMap, PhotoUpload, Relay, equals_criteria, input::non_blank,
	},
};

const CANDIDATES: &str = "Candidates";

/// Candidate photo as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidatePhoto {
	/// Image content type (always `image/*`).
	pub content_type: String,
	/// Image bytes (never empty).
	pub bytes: Bytes,
}
impl CandidatePhoto {
	/// File extension derived from the content type, e.g. `jpeg` for `image/jpeg`.
	pub fn extension(&self) -> &str {
		let subtype = self.content_type.split(';').next().unwrap_or_default().trim();
		let subtype = subtype.split_once('/').map(|(_, subtype)| subtype).unwrap_or(subtype);
		let subtype = subtype.split('+').next().unwrap_or(subtype);

		if subtype.is_empty() { "bin" } else { subtype }
	}

	/// Attachment file name offered to downloaders.
	pub fn file_name(&self, candidate_id: &CandidateId) -> String {
		format!("candidate-{candidate_id}.{}", self.extension())
	}
}

/// Body of an association request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Association {
	/// Job openings the candidates are attached to.
	pub job_ids: Vec<JobOpeningId>,
	/// Candidates to attach.
	pub candidate_ids: Vec<CandidateId>,
	/// Optional comment recorded with the association.
	pub comments: Option<String>,
}
impl Association {
	/// Validates that both id lists are non-empty.
	pub fn new(
		job_ids: Vec<JobOpeningId>,
		candidate_ids: Vec<CandidateId>,
		comments: Option<String>,
	) -> Result<Self, ClientInputError> {
		if job_ids.is_empty() {
			return Err(ClientInputError::missing("jobIds"));
		}
		if candidate_ids.is_empty() {
			return Err(ClientInputError::missing("candidateIds"));
		}

		Ok(Self { job_ids, candidate_ids, comments: non_blank(comments) })
	}

	fn into_envelope(self) -> JsonValue {
		let mut entry = JsonMap::new();

		entry.insert("jobids".into(), self.job_ids.into_iter().map(String::from).collect());
		entry.insert("ids".into(), self.candidate_ids.into_iter().map(String::from).collect());

		if let Some(comments) = self.comments {
			entry.insert("comments".into(), comments.into());
		}

		serde_json::json!({ "data": [entry] })
	}
}

impl Relay {
	/// Searches candidates by email or by the configured correlation field.
	///
	/// Returns the upstream search payload verbatim; `null` when nothing matched.
	pub async fn fetch_candidate(&self, lookup: CandidateLookup) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::FetchCandidate;

		self.observe(OPERATION, async {
			let mut url = self.descriptor.api_url([CANDIDATES, "search"])?;

			match &lookup {
				CandidateLookup::Email(email) => {
					url.query_pairs_mut().append_pair("email", email);
				},
				CandidateLookup::Correlation(id) => {
					let criteria =
						equals_criteria(&self.descriptor.quirks.candidate_correlation_field, id);

					url.query_pairs_mut().append_pair("criteria", &criteria);
				},
			}

			self.authorized_call(&ApiRequest::get(OPERATION, url)).await?.json()
		})
		.await
	}

	/// Creates a candidate record from `fields`.
	pub async fn create_candidate(&self, fields: FieldMap) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::CreateCandidate;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([CANDIDATES])?;
			let request = ApiRequest::new(OPERATION, Method::POST, url).json(fields.into_envelope());

			self.authorized_call(&request).await?.json()
		})
		.await
	}

	/// Applies a partial update to a candidate.
	pub async fn update_candidate(&self, id: &CandidateId, updates: FieldMap) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::UpdateCandidate;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([CANDIDATES, id.as_ref()])?;
			let request = ApiRequest::new(OPERATION, Method::PUT, url).json(updates.into_envelope());

			self.authorized_call(&request).await?.json()
		})
		.await
	}

	/// Downloads a candidate's photo, rejecting empty or non-image responses.
	pub async fn download_photo(&self, id: &CandidateId) -> Result<CandidatePhoto> {
		const OPERATION: RelayOperation = RelayOperation::DownloadPhoto;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([CANDIDATES, id.as_ref(), "photo"])?;
			let response = self.authorized_call(&ApiRequest::get(OPERATION, url)).await?;
			let content_type = response.content_type().unwrap_or_default().trim().to_owned();

			if !is_image(&content_type) {
				return Err(UpstreamError::NotAnImage {
					content_type: if content_type.is_empty() {
						"<missing>".into()
					} else {
						content_type
					},
				}
				.into());
			}
			if response.body.is_empty() {
				return Err(UpstreamError::EmptyPhoto.into());
			}

			Ok(CandidatePhoto { content_type, bytes: response.body })
		})
		.await
	}

	/// Uploads a photo for a candidate as multipart form data.
	pub async fn upload_photo(&self, id: &CandidateId, photo: PhotoUpload) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::UploadPhoto;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([CANDIDATES, id.as_ref(), "photo"])?;
			let request = ApiRequest::new(OPERATION, Method::POST, url).photo(photo);

			self.authorized_call(&request).await?.json()
		})
		.await
	}

	/// Associates candidates with job openings.
	pub async fn associate_candidates(&self, association: Association) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::AssociateCandidates;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([CANDIDATES, "actions", "associate"])?;
			let request =
				ApiRequest::new(OPERATION, Method::PUT, url).json(association.into_envelope());

			self.authorized_call(&request).await?.json()
		})
		.await
	}

	/// Lists the applications related to a candidate.
	pub async fn fetch_related_applications(&self, id: &CandidateId) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::FetchRelatedApplications;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url([CANDIDATES, id.as_ref(), "Applications"])?;

			self.authorized_call(&ApiRequest::get(OPERATION, url)).await?.json()
		})
		.await
	}
}

fn is_image(content_type: &str) -> bool {
	content_type
		.get(..6)
		.is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
