// crates.io
use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
// self
use crate::{_prelude::*, error::ClientInputError};

/// JSON error body returned by every route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Per-operation summary.
	pub error: String,
	/// Display string of the underlying error.
	pub details: String,
}

/// Relay error paired with the summary of the operation that produced it.
#[derive(Debug)]
pub struct ApiError {
	summary: &'static str,
	error: Error,
}
impl ApiError {
	/// Attaches an operation summary to an error.
	pub fn new(summary: &'static str, error: impl Into<Error>) -> Self {
		Self { summary, error: error.into() }
	}

	/// Wraps an extractor rejection (bad JSON, query, or multipart framing) as client input.
	pub fn malformed(summary: &'static str, message: impl Into<String>) -> Self {
		Self::new(summary, ClientInputError::MalformedBody { message: message.into() })
	}

	/// Status code the error maps to.
	pub fn status(&self) -> StatusCode {
		if self.error.is_client_input() {
			StatusCode::BAD_REQUEST
		} else {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}

	/// Underlying relay error.
	pub fn error(&self) -> &Error {
		&self.error
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let body = ErrorBody { error: self.summary.into(), details: self.error.to_string() };

		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::UpstreamError;

	#[test]
	fn client_input_is_bad_request_everything_else_is_internal() {
		let err = ApiError::new("Failed to fetch candidate data.", ClientInputError::missing("email"));

		assert_eq!(err.status(), StatusCode::BAD_REQUEST);

		let err = ApiError::malformed("Failed to create candidate.", "EOF while parsing");

		assert_eq!(err.status(), StatusCode::BAD_REQUEST);

		let err = ApiError::new("Failed to download photo.", UpstreamError::EmptyPhoto);

		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let err = ApiError::new(
			"Failed to fetch candidate data.",
			Error::InvalidGrant { reason: "invalid_code".into() },
		);

		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
