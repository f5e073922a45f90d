//! Observability helpers for relay operations.
//!
//! Every operation runs inside a `recruit_relay.operation` span carrying the `operation`
//! and `phase` fields. Enable the `metrics` feature to increment the
//! `recruit_relay_operation_total` counter for every attempt, retry, success, and failure,
//! labeled by `operation` + `outcome`.

mod counter;
mod logging;
mod span;

pub use counter::*;
pub use logging::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Operations observed by the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelayOperation {
	/// Access token refresh against the token endpoint.
	RefreshToken,
	/// Candidate lookup by email or correlation id.
	FetchCandidate,
	/// Candidate creation.
	CreateCandidate,
	/// Candidate partial update.
	UpdateCandidate,
	/// Candidate photo download.
	DownloadPhoto,
	/// Candidate photo upload.
	UploadPhoto,
	/// Job opening creation.
	CreateJobOpening,
	/// Job opening lookup by correlation id.
	FetchJobOpening,
	/// Candidate to job opening association.
	AssociateCandidates,
	/// Applications related to a candidate.
	FetchRelatedApplications,
	/// Application partial update.
	UpdateApplication,
}
impl RelayOperation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RelayOperation::RefreshToken => "refresh_token",
			RelayOperation::FetchCandidate => "fetch_candidate",
			RelayOperation::CreateCandidate => "create_candidate",
			RelayOperation::UpdateCandidate => "update_candidate",
			RelayOperation::DownloadPhoto => "download_photo",
			RelayOperation::UploadPhoto => "upload_photo",
			RelayOperation::CreateJobOpening => "create_job_opening",
			RelayOperation::FetchJobOpening => "fetch_job_opening",
			RelayOperation::AssociateCandidates => "associate_candidates",
			RelayOperation::FetchRelatedApplications => "fetch_related_applications",
			RelayOperation::UpdateApplication => "update_application",
		}
	}
}
impl Display for RelayOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Token was rejected and the call is being retried once.
	Retry,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Retry => "retry",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
