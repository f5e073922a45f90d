//! Strongly typed record identifiers that are safe to interpolate into upstream URL paths.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (candidate, job opening, application).
		kind: &'static str,
	},
	/// The identifier contains characters that are not path-safe.
	#[error("{kind} identifier contains an unsupported character: {found:?}.")]
	UnsupportedCharacter {
		/// Kind of identifier (candidate, job opening, application).
		kind: &'static str,
		/// First offending character.
		found: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (candidate, job opening, application).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { CandidateId, "Upstream record identifier for a candidate.", "Candidate" }
def_id! { JobOpeningId, "Upstream record identifier for a job opening.", "JobOpening" }
def_id! { ApplicationId, "Upstream record identifier for an application.", "Application" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(found) = view.chars().find(|ch| !is_path_safe(*ch)) {
		return Err(IdentifierError::UnsupportedCharacter { kind, found });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

fn is_path_safe(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_path_unsafe_values() {
		assert!(CandidateId::new(" 123").is_err(), "Leading whitespace must be rejected.");
		assert!(CandidateId::new("123/photo").is_err(), "Slashes must be rejected.");
		assert!(JobOpeningId::new("").is_err());
		assert!(ApplicationId::new("a?b=c").is_err());

		let candidate = CandidateId::new("598012000000123")
			.expect("Numeric candidate fixture should be considered valid.");

		assert_eq!(candidate.as_ref(), "598012000000123");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let candidate: CandidateId = serde_json::from_str("\"598012000000123\"")
			.expect("Candidate should deserialize successfully.");

		assert_eq!(&*candidate, "598012000000123");
		assert!(serde_json::from_str::<CandidateId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<CandidateId>("\"../admin\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "1".repeat(IDENTIFIER_MAX_LEN);

		ApplicationId::new(&exact).expect("Exact length should succeed.");

		let too_long = "1".repeat(IDENTIFIER_MAX_LEN + 1);

		assert_eq!(
			ApplicationId::new(&too_long),
			Err(IdentifierError::TooLong { kind: "Application", max: IDENTIFIER_MAX_LEN })
		);
	}

	#[test]
	fn errors_report_the_offending_character() {
		let err = CandidateId::new("12#3").expect_err("Hash signs are not path-safe.");

		assert_eq!(err, IdentifierError::UnsupportedCharacter { kind: "Candidate", found: '#' });
		assert_eq!(err.to_string(), "Candidate identifier contains an unsupported character: '#'.");
	}
}
