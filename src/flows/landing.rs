//! Root page landing parser.
//!
//! Accepts the same parameter shape as the callback page so the second hop of the callback
//! round-trip lands here with the identity already encoded in the URL.

// self
use crate::{_prelude::*, auth::ExternalUserId, flows::common::CallbackParams};

/// What the root page found in its own URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandingOutcome {
	/// A successful callback was adopted; the session now holds this identity.
	SignedIn(ExternalUserId),
	/// The provider reported an error; the message is the visible sign-in error.
	SignInFailed(String),
	/// No callback parameters were present.
	Untouched,
}
impl LandingOutcome {
	/// Classifies the landing parameters found on `url`.
	pub fn classify(url: &Url) -> Self {
		let params = CallbackParams::from_url(url);

		if let Some(id) = params.valid_external_user_id().filter(|_| params.is_success()) {
			return Self::SignedIn(id);
		}

		match params.provider_error() {
			Some(error) => Self::SignInFailed(format!("Google sign-in failed: {error}")),
			None => Self::Untouched,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn landing(query: &str) -> LandingOutcome {
		let url = Url::parse(&format!("http://localhost:5175/?{query}"))
			.expect("Landing URL fixture should parse.");

		LandingOutcome::classify(&url)
	}

	#[test]
	fn landing_accepts_callback_shape() {
		assert_eq!(
			landing("success=true&external_user_id=user_1"),
			LandingOutcome::SignedIn(
				ExternalUserId::new("user_1").expect("Identifier fixture should be valid.")
			)
		);
		assert_eq!(
			landing("error=access_denied"),
			LandingOutcome::SignInFailed("Google sign-in failed: access_denied".into())
		);
		assert_eq!(
			landing(&format!("success=true&external_user_id={}", "x".repeat(200))),
			LandingOutcome::SignedIn(
				ExternalUserId::new("x".repeat(200)).expect("Long identifier should be valid.")
			)
		);
		assert_eq!(landing("success=true"), LandingOutcome::Untouched);
		assert_eq!(landing("tab=week"), LandingOutcome::Untouched);
	}
}
