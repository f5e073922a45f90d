// crates.io
use axum::{
	Json,
	extract::{
		Multipart, Query, State,
		multipart::MultipartRejection,
		rejection::{JsonRejection, QueryRejection},
	},
	http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
	response::{IntoResponse, Response},
};
// self
use crate::{
	_prelude::*,
	api::ApiError,
	auth::{ApplicationId, CandidateId, JobOpeningId},
	error::ClientInputError,
	relay::{Association, CandidateLookup, FieldMap, PhotoUpload, Relay, input::non_blank},
};

type ApiResult<T> = Result<T, ApiError>;

trait Summarize<T> {
	fn summarize(self, summary: &'static str) -> ApiResult<T>;
}
impl<T, E> Summarize<T> for Result<T, E>
where
	E: Into<Error>,
{
	fn summarize(self, summary: &'static str) -> ApiResult<T> {
		self.map_err(|err| ApiError::new(summary, err))
	}
}

#[derive(Debug, Deserialize)]
pub(super) struct FetchCandidateQuery {
	email: Option<String>,
	computrabajo_candidate_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CandidateIdQuery {
	candidate_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FetchJobOpeningQuery {
	computrabajo_oi: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateCandidateBody {
	candidate_id: Option<String>,
	updates: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssociateCandidateBody {
	job_ids: Option<Vec<String>>,
	candidate_ids: Option<Vec<String>>,
	comments: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateApplicationBody {
	application_id: Option<String>,
	updates: Option<JsonValue>,
}

pub(super) async fn fetch_candidate(
	State(relay): State<Relay>,
	query: Result<Query<FetchCandidateQuery>, QueryRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to fetch candidate data.";

	let Query(query) = query.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let lookup =
		CandidateLookup::from_params(query.email, query.computrabajo_candidate_id).summarize(SUMMARY)?;

	relay.fetch_candidate(lookup).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn create_candidate(
	State(relay): State<Relay>,
	body: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to create candidate.";

	let Json(body) = body.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let fields = FieldMap::new("candidate", body).summarize(SUMMARY)?;

	relay.create_candidate(fields).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn update_candidate(
	State(relay): State<Relay>,
	body: Result<Json<UpdateCandidateBody>, JsonRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to update candidate.";

	let Json(body) = body.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let id = candidate_id(body.candidate_id).summarize(SUMMARY)?;
	let updates = FieldMap::new("updates", body.updates.unwrap_or_default()).summarize(SUMMARY)?;

	relay.update_candidate(&id, updates).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn download_photo(
	State(relay): State<Relay>,
	query: Result<Query<CandidateIdQuery>, QueryRejection>,
) -> ApiResult<Response> {
	const SUMMARY: &str = "Failed to download photo.";

	let Query(query) = query.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let id = candidate_id(query.candidate_id).summarize(SUMMARY)?;
	let photo = relay.download_photo(&id).await.summarize(SUMMARY)?;
	let disposition = format!("attachment; filename=\"{}\"", photo.file_name(&id));
	let headers = [
		(CONTENT_TYPE, photo.content_type.clone()),
		(CONTENT_LENGTH, photo.bytes.len().to_string()),
		(CONTENT_DISPOSITION, disposition),
	];

	Ok((headers, photo.bytes).into_response())
}

pub(super) async fn upload_photo(
	State(relay): State<Relay>,
	multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to upload photo.";

	let mut multipart =
		multipart.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let mut raw_id = None;
	let mut photo = None;

	while let Some(field) =
		multipart.next_field().await.map_err(|err| ApiError::malformed(SUMMARY, err.body_text()))?
	{
		let name = field.name().map(str::to_owned);

		match name.as_deref() {
			Some("candidateId") => {
				raw_id = Some(
					field.text().await.map_err(|err| ApiError::malformed(SUMMARY, err.body_text()))?,
				);
			},
			Some("file") => {
				let file_name = field.file_name().map(str::to_owned);
				let content_type = field.content_type().map(str::to_owned);
				let bytes =
					field.bytes().await.map_err(|err| ApiError::malformed(SUMMARY, err.body_text()))?;

				photo = Some(PhotoUpload::new(bytes, file_name, content_type).summarize(SUMMARY)?);
			},
			_ => {},
		}
	}

	let id = candidate_id(raw_id).summarize(SUMMARY)?;
	let photo = photo.ok_or(ClientInputError::missing("file")).summarize(SUMMARY)?;

	relay.upload_photo(&id, photo).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn create_job_opening(
	State(relay): State<Relay>,
	body: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to create job opening.";

	let Json(body) = body.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let fields = FieldMap::new("jobOpening", body).summarize(SUMMARY)?;

	relay.create_job_opening(fields).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn fetch_job_opening(
	State(relay): State<Relay>,
	query: Result<Query<FetchJobOpeningQuery>, QueryRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to fetch job opening.";

	let Query(query) = query.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let correlation_id = non_blank(query.computrabajo_oi)
		.ok_or(ClientInputError::missing("computrabajo_oi"))
		.summarize(SUMMARY)?;

	relay.fetch_job_opening(&correlation_id).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn associate_candidate(
	State(relay): State<Relay>,
	body: Result<Json<AssociateCandidateBody>, JsonRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to associate candidates.";

	let Json(body) = body.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let job_ids = body
		.job_ids
		.unwrap_or_default()
		.iter()
		.map(JobOpeningId::new)
		.collect::<Result<Vec<_>, _>>()
		.map_err(ClientInputError::from)
		.summarize(SUMMARY)?;
	let candidate_ids = body
		.candidate_ids
		.unwrap_or_default()
		.iter()
		.map(CandidateId::new)
		.collect::<Result<Vec<_>, _>>()
		.map_err(ClientInputError::from)
		.summarize(SUMMARY)?;
	let association = Association::new(job_ids, candidate_ids, body.comments).summarize(SUMMARY)?;

	relay.associate_candidates(association).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn fetch_related_applications(
	State(relay): State<Relay>,
	query: Result<Query<CandidateIdQuery>, QueryRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to fetch related applications.";

	let Query(query) = query.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let id = candidate_id(query.candidate_id).summarize(SUMMARY)?;

	relay.fetch_related_applications(&id).await.map(Json).summarize(SUMMARY)
}

pub(super) async fn update_application(
	State(relay): State<Relay>,
	body: Result<Json<UpdateApplicationBody>, JsonRejection>,
) -> ApiResult<Json<JsonValue>> {
	const SUMMARY: &str = "Failed to update application.";

	let Json(body) = body.map_err(|rejection| ApiError::malformed(SUMMARY, rejection.body_text()))?;
	let raw_id = non_blank(body.application_id).ok_or(ClientInputError::missing("applicationId"));
	let id = raw_id
		.and_then(|raw| ApplicationId::new(raw).map_err(ClientInputError::from))
		.summarize(SUMMARY)?;
	let updates = FieldMap::new("updates", body.updates.unwrap_or_default()).summarize(SUMMARY)?;

	relay.update_application(&id, updates).await.map(Json).summarize(SUMMARY)
}

fn candidate_id(raw: Option<String>) -> Result<CandidateId, ClientInputError> {
	let raw = non_blank(raw).ok_or(ClientInputError::missing("candidateId"))?;

	Ok(CandidateId::new(raw)?)
}
