//! Shared helpers for flow implementations (callback parameter parsing and encoding).
//!
//! The callback query string is the resume token carried across full-page navigations. The
//! provider writes it onto the callback page URL, and the callback page re-encodes the same shape
//! onto the application root so the landing parser can pick it up without another provider
//! round-trip.

// self
use crate::{_prelude::*, auth::ExternalUserId};

/// Query parameter flagging a successful authorization.
pub const SUCCESS_PARAM: &str = "success";
/// Query parameter carrying the provider's error message.
pub const ERROR_PARAM: &str = "error";
/// Query parameter carrying the external user identifier.
pub const EXTERNAL_USER_ID_PARAM: &str = "external_user_id";

/// Raw callback parameters as found in a URL query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// `success` flag; only the exact value `"true"` counts.
	pub success: Option<String>,
	/// Provider error message.
	pub error: Option<String>,
	/// External user identifier.
	pub external_user_id: Option<String>,
}
impl CallbackParams {
	/// Parses the parameters from a URL's query string.
	pub fn from_url(url: &Url) -> Self {
		url.query().map(Self::from_query).unwrap_or_default()
	}

	/// Parses the parameters from a raw query string (without the leading `?`).
	///
	/// Repeated keys keep their first value.
	pub fn from_query(query: &str) -> Self {
		let mut params = Self::default();

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let slot = match key.as_ref() {
				SUCCESS_PARAM => &mut params.success,
				ERROR_PARAM => &mut params.error,
				EXTERNAL_USER_ID_PARAM => &mut params.external_user_id,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		params
	}

	/// Parameters describing a successful authorization for `id`.
	pub fn succeeded(id: &ExternalUserId) -> Self {
		Self {
			success: Some("true".into()),
			error: None,
			external_user_id: Some(id.as_str().to_owned()),
		}
	}

	/// Returns `true` when the success flag is exactly `"true"`.
	pub fn is_success(&self) -> bool {
		self.success.as_deref() == Some("true")
	}

	/// The external user identifier, when present and valid.
	pub fn valid_external_user_id(&self) -> Option<ExternalUserId> {
		self.external_user_id.as_deref().and_then(|raw| ExternalUserId::new(raw).ok())
	}

	/// The provider error, when present and non-empty.
	pub fn provider_error(&self) -> Option<&str> {
		self.error.as_deref().filter(|e| !e.is_empty())
	}

	/// Returns `url` with its query replaced by these parameters.
	pub fn applied_to(&self, url: &Url) -> Url {
		let mut target = url.clone();

		target.set_query(None);

		{
			let mut pairs = target.query_pairs_mut();

			if let Some(success) = &self.success {
				pairs.append_pair(SUCCESS_PARAM, success);
			}
			if let Some(error) = &self.error {
				pairs.append_pair(ERROR_PARAM, error);
			}
			if let Some(id) = &self.external_user_id {
				pairs.append_pair(EXTERNAL_USER_ID_PARAM, id);
			}
		}

		if target.query() == Some("") {
			target.set_query(None);
		}

		target
	}
}

/// Returns `url` reduced to its path, as `history.replaceState` with `location.pathname` would.
pub(crate) fn without_query(url: &Url) -> Url {
	let mut bare = url.clone();

	bare.set_query(None);
	bare.set_fragment(None);

	bare
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_first_occurrence_and_decodes() {
		let params = CallbackParams::from_query(
			"success=true&external_user_id=user%20one&external_user_id=ignored&extra=1",
		);

		assert!(params.is_success());
		assert_eq!(params.external_user_id.as_deref(), Some("user one"));
		assert_eq!(params.error, None);
	}

	#[test]
	fn success_flag_is_exact() {
		assert!(!CallbackParams::from_query("success=TRUE").is_success());
		assert!(!CallbackParams::from_query("success=1").is_success());
		assert!(!CallbackParams::default().is_success());
	}

	#[test]
	fn empty_values_count_as_absent() {
		let params = CallbackParams::from_query("error=&external_user_id=");

		assert_eq!(params.provider_error(), None);
		assert_eq!(params.valid_external_user_id(), None);
	}

	#[test]
	fn succeeded_parameters_encode_onto_root() {
		let id = ExternalUserId::new("user&co").expect("Identifier fixture should be valid.");
		let root = Url::parse("http://localhost:5175/?stale=1#frag").expect("Root should parse.");
		let target = CallbackParams::succeeded(&id).applied_to(&root);

		assert_eq!(
			target.as_str(),
			"http://localhost:5175/?success=true&external_user_id=user%26co#frag"
		);
		assert_eq!(CallbackParams::from_url(&target), CallbackParams::succeeded(&id));
	}

	#[test]
	fn without_query_keeps_path_only() {
		let url = Url::parse("http://localhost:5175/app?success=true#x").expect("URL should parse.");

		assert_eq!(without_query(&url).as_str(), "http://localhost:5175/app");
	}
}
