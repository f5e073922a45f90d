//! Validated operation inputs. Constructing these is where client-input errors arise, so
//! every relay operation starts from data that is already known to be well formed.

// crates.io
use reqwest::{
	Body,
	multipart::{Form, Part},
};
// self
use crate::{_prelude::*, error::ClientInputError};

/// Non-empty JSON object of upstream field names to values.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMap(JsonMap<String, JsonValue>);
impl FieldMap {
	/// Accepts `value` only if it is a non-empty JSON object; `field` names it in errors.
	pub fn new(field: &'static str, value: JsonValue) -> Result<Self, ClientInputError> {
		match value {
			JsonValue::Object(map) if map.is_empty() =>
				Err(ClientInputError::invalid(field, "must contain at least one field")),
			JsonValue::Object(map) => Ok(Self(map)),
			JsonValue::Null => Err(ClientInputError::missing(field)),
			_ => Err(ClientInputError::invalid(field, "must be a JSON object")),
		}
	}

	/// Wraps the fields in the `{"data":[...]}` envelope the API expects.
	pub fn into_envelope(self) -> JsonValue {
		serde_json::json!({ "data": [JsonValue::Object(self.0)] })
	}
}

/// Natural key used to search for a candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CandidateLookup {
	/// Search by candidate email.
	Email(String),
	/// Search by the job-board correlation id stored in a custom field.
	Correlation(String),
}
impl CandidateLookup {
	/// Picks a lookup from optional query parameters; `email` wins when both are present.
	pub fn from_params(
		email: Option<String>,
		correlation_id: Option<String>,
	) -> Result<Self, ClientInputError> {
		if let Some(email) = non_blank(email) {
			return Ok(Self::Email(email));
		}
		if let Some(id) = non_blank(correlation_id) {
			return Ok(Self::Correlation(id));
		}

		Err(ClientInputError::missing("email"))
	}
}

/// Binary photo received from the caller, ready to be forwarded as multipart content.
#[derive(Clone, Debug)]
pub struct PhotoUpload {
	bytes: Bytes,
	file_name: String,
	content_type: String,
}
impl PhotoUpload {
	const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
	const DEFAULT_FILE_NAME: &str = "photo";

	/// Wraps uploaded bytes, falling back to generic file name and content type.
	pub fn new(
		bytes: Bytes,
		file_name: Option<String>,
		content_type: Option<String>,
	) -> Result<Self, ClientInputError> {
		if bytes.is_empty() {
			return Err(ClientInputError::invalid("file", "uploaded file is empty"));
		}

		let photo = Self {
			bytes,
			file_name: non_blank(file_name).unwrap_or_else(|| Self::DEFAULT_FILE_NAME.into()),
			content_type: non_blank(content_type)
				.unwrap_or_else(|| Self::DEFAULT_CONTENT_TYPE.into()),
		};

		// Surface an unparsable content type now rather than after a token refresh.
		photo.to_form()?;

		Ok(photo)
	}

	/// Uploaded bytes.
	pub fn bytes(&self) -> &Bytes {
		&self.bytes
	}

	/// File name forwarded upstream.
	pub fn file_name(&self) -> &str {
		&self.file_name
	}

	/// Content type forwarded upstream.
	pub fn content_type(&self) -> &str {
		&self.content_type
	}

	/// Builds a fresh multipart form with the photo under the `file` field.
	///
	/// Forms are single-use, so a retried request calls this again.
	pub fn to_form(&self) -> Result<Form, ClientInputError> {
		let length = u64::try_from(self.bytes.len()).unwrap_or(u64::MAX);
		let part = Part::stream_with_length(Body::from(self.bytes.clone()), length)
			.file_name(self.file_name.clone())
			.mime_str(&self.content_type)
			.map_err(|_| {
				ClientInputError::invalid("file", format!("unsupported content type `{}`", self.content_type))
			})?;

		Ok(Form::new().part("file", part))
	}
}

/// Escapes a value for the `(field:equals:value)` criteria syntax.
pub fn escape_criteria_value(value: &str) -> String {
	let mut buf = String::with_capacity(value.len());

	for ch in value.chars() {
		if matches!(ch, '\\' | '(' | ')' | ',') {
			buf.push('\\');
		}

		buf.push(ch);
	}

	buf
}

/// Formats an equality criteria expression for search endpoints.
pub fn equals_criteria(field: &str, value: &str) -> String {
	format!("({field}:equals:{})", escape_criteria_value(value))
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}
