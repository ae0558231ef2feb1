//! Strongly typed external-user identifiers.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const PROPOSED_PREFIX: &str = "user_";
const PROPOSED_SUFFIX_LEN: usize = 16;

/// Opaque identifier correlating a browser session with an account on the remote calendar
/// service.
///
/// The remote service owns the format; the only local requirement is that it is non-empty.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalUserId(String);
impl ExternalUserId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Generates a request-scoped identifier proposed to the authorization service.
	///
	/// The suffix is random alphanumeric text. It avoids collisions between concurrent sign-in
	/// attempts but is not a secret and must not be treated as one.
	pub fn propose() -> Self {
		let suffix: String = rand::rng()
			.sample_iter(Alphanumeric)
			.take(PROPOSED_SUFFIX_LEN)
			.map(char::from)
			.collect();

		Self(format!("{PROPOSED_PREFIX}{suffix}"))
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ExternalUserId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ExternalUserId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ExternalUserId> for String {
	fn from(value: ExternalUserId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ExternalUserId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ExternalUserId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ExternalUserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ExternalUser({})", self.0)
	}
}
impl Display for ExternalUserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ExternalUserId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("External user identifier cannot be empty.")]
	Empty,
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		assert_eq!(ExternalUserId::new(""), Err(IdentifierError::Empty));

		let user = ExternalUserId::new("some-user-1").expect("Identifier fixture should be valid.");

		assert_eq!(user.as_str(), "some-user-1");
		assert_eq!(format!("{user:?}"), "ExternalUser(some-user-1)");
	}

	#[test]
	fn any_non_empty_value_is_accepted() {
		let long = "x".repeat(200);

		for raw in [long.as_str(), "user\n1", " ", "ü/?&#"] {
			let user = ExternalUserId::new(raw).expect("Opaque identifier should be accepted.");

			assert_eq!(user.as_str(), raw);
		}
	}

	#[test]
	fn proposed_identifiers_are_prefixed_and_distinct() {
		let a = ExternalUserId::propose();
		let b = ExternalUserId::propose();

		assert!(a.starts_with(PROPOSED_PREFIX));
		assert_eq!(a.len(), PROPOSED_PREFIX.len() + PROPOSED_SUFFIX_LEN);
		assert!(a[PROPOSED_PREFIX.len()..].chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(a, b);
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let user: ExternalUserId =
			serde_json::from_str("\"user_abc\"").expect("Identifier should deserialize.");

		assert_eq!(user.as_ref(), "user_abc");
		assert!(serde_json::from_str::<ExternalUserId>("\"\"").is_err());
	}
}
