//! Callback page controller.
//!
//! The provider redirects to a dedicated callback page rather than the application root. The page
//! classifies the callback parameters, persists a successful identity, and hands the host a
//! delayed redirect back to the root carrying the same parameters, so the root's landing parser
//! adopts the identity without another provider round-trip. Failures never auto-redirect; the
//! page offers a manual return instead.

// self
use crate::{
	_prelude::*,
	auth::ExternalUserId,
	config::ConnectorConfig,
	flows::common::CallbackParams,
	nav::Navigator,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::Session,
};

/// Classification of callback parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
	/// `success == "true"` and a valid identifier is present.
	Success {
		/// Identifier assigned by the remote service.
		external_user_id: ExternalUserId,
	},
	/// The provider reported an error.
	Failure {
		/// Provider-supplied reason.
		reason: String,
	},
	/// Neither a usable success nor an error; includes a success flag without identifier.
	Malformed,
}
impl CallbackOutcome {
	/// Classifies raw callback parameters.
	///
	/// Success takes precedence over an error parameter; an error is honoured whenever success is
	/// not established.
	pub fn classify(params: &CallbackParams) -> Self {
		if let Some(external_user_id) =
			params.valid_external_user_id().filter(|_| params.is_success())
		{
			return Self::Success { external_user_id };
		}

		match params.provider_error() {
			Some(reason) => Self::Failure { reason: reason.to_owned() },
			None => Self::Malformed,
		}
	}

	/// The terminal error for this attempt, if it did not succeed.
	pub fn error(&self) -> Option<CallbackError> {
		match self {
			Self::Success { .. } => None,
			Self::Failure { reason } => Some(CallbackError::Provider { reason: reason.clone() }),
			Self::Malformed => Some(CallbackError::Malformed),
		}
	}
}

/// Terminal callback failures; the user must restart sign-in.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CallbackError {
	/// The provider reported an error.
	#[error("OAuth failed: {reason}")]
	Provider {
		/// Provider-supplied reason.
		reason: String,
	},
	/// The callback carried neither a usable success nor an error.
	#[error("Invalid callback parameters")]
	Malformed,
}

/// Display status of the callback page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackStatus {
	/// Parameters not yet processed.
	Loading,
	/// Identity persisted; a redirect is pending.
	Success,
	/// Failure or malformed callback.
	Error,
}
impl CallbackStatus {
	/// Page heading for the status.
	pub const fn heading(self) -> &'static str {
		match self {
			CallbackStatus::Loading => "Processing Google Calendar Connection...",
			CallbackStatus::Success => "Connected Successfully!",
			CallbackStatus::Error => "Connection Failed",
		}
	}
}

/// Navigation the host must perform after `delay`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRedirect {
	/// Destination URL.
	pub target: Url,
	/// Delay before navigating.
	pub delay: Duration,
}
impl PendingRedirect {
	/// Performs the navigation.
	pub fn fire(&self, navigator: &dyn Navigator) {
		navigator.assign(&self.target);
	}
}

/// Processed callback page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackPage {
	/// Parameter classification.
	pub outcome: CallbackOutcome,
	/// Display status.
	pub status: CallbackStatus,
	/// Human-readable message.
	pub message: String,
	/// Automatic return to the root, only set on success.
	pub redirect: Option<PendingRedirect>,
	return_url: Url,
}
impl CallbackPage {
	/// Classifies the callback found on `url`, persisting a successful identity into `session`.
	pub fn load(url: &Url, session: &Session, config: &ConnectorConfig) -> Result<Self> {
		const KIND: FlowKind = FlowKind::Callback;

		let _guard = FlowSpan::new(KIND, "load_callback").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let params = CallbackParams::from_url(url);
		let outcome = CallbackOutcome::classify(&params);
		let return_url = config.root_url();
		let (status, message, redirect) = match &outcome {
			CallbackOutcome::Success { external_user_id } => {
				session.set(external_user_id).inspect_err(|_| {
					obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				})?;

				let target = CallbackParams::succeeded(external_user_id).applied_to(&return_url);

				(
					CallbackStatus::Success,
					format!("Successfully connected Google Calendar for user {external_user_id}"),
					Some(PendingRedirect { target, delay: config.redirect_delay }),
				)
			},
			CallbackOutcome::Failure { .. } | CallbackOutcome::Malformed => {
				let message = outcome.error().map(|e| e.to_string()).unwrap_or_default();

				obs::record_warning(KIND, &message);

				(CallbackStatus::Error, message, None)
			},
		};
		let page = Self { outcome, status, message, redirect, return_url };

		match page.status {
			CallbackStatus::Success => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			_ => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		Ok(page)
	}

	/// Whether the page offers the manual "return to app" action.
	pub fn offers_return(&self) -> bool {
		matches!(self.status, CallbackStatus::Error)
	}

	/// Manual "return to app" action: navigates to the application root.
	pub fn return_to_app(&self, navigator: &dyn Navigator) {
		navigator.assign(&self.return_url);
	}

	/// Converts the page into the terminal error it represents, if any.
	pub fn into_result(self) -> Result<ExternalUserId> {
		match self.outcome {
			CallbackOutcome::Success { external_user_id } => Ok(external_user_id),
			other => Err(other.error().unwrap_or(CallbackError::Malformed).into()),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::test_config,
		nav::{Navigation, RecordingNavigator},
		session::SESSION_KEY,
		store::{MemoryStore, SessionStore},
	};

	fn params(query: &str) -> CallbackParams {
		CallbackParams::from_query(query)
	}

	fn callback_url(query: &str) -> Url {
		Url::parse(&format!("http://localhost:5175/google/callback?{query}"))
			.expect("Callback URL fixture should parse.")
	}

	#[test]
	fn classification_table() {
		let user = ExternalUserId::new("u1").expect("Identifier fixture should be valid.");

		assert_eq!(
			CallbackOutcome::classify(&params("success=true&external_user_id=u1")),
			CallbackOutcome::Success { external_user_id: user.clone() }
		);
		assert_eq!(
			CallbackOutcome::classify(&params("success=true&external_user_id=u1&error=late")),
			CallbackOutcome::Success { external_user_id: user }
		);
		assert_eq!(CallbackOutcome::classify(&params("success=true")), CallbackOutcome::Malformed);
		assert_eq!(
			CallbackOutcome::classify(&params("success=true&external_user_id=")),
			CallbackOutcome::Malformed
		);
		assert_eq!(
			CallbackOutcome::classify(&params("error=access_denied")),
			CallbackOutcome::Failure { reason: "access_denied".into() }
		);
		assert_eq!(
			CallbackOutcome::classify(&params("success=false&error=denied&external_user_id=u1")),
			CallbackOutcome::Failure { reason: "denied".into() }
		);
		assert_eq!(
			CallbackOutcome::classify(&params("success=true&error=denied")),
			CallbackOutcome::Failure { reason: "denied".into() }
		);
		assert_eq!(CallbackOutcome::classify(&params("")), CallbackOutcome::Malformed);
		assert_eq!(
			CallbackOutcome::classify(&params("external_user_id=u1")),
			CallbackOutcome::Malformed
		);

		let long = "x".repeat(200);

		assert_eq!(
			CallbackOutcome::classify(&params(&format!("success=true&external_user_id={long}"))),
			CallbackOutcome::Success {
				external_user_id: ExternalUserId::new(&long).expect("Long identifier should be valid.")
			}
		);
		assert_eq!(
			CallbackOutcome::classify(&params("success=true&external_user_id=user%0A1")),
			CallbackOutcome::Success {
				external_user_id: ExternalUserId::new("user\n1")
					.expect("Identifier with a control character should be valid.")
			}
		);
	}

	#[test]
	fn success_persists_and_schedules_redirect() {
		let backend = MemoryStore::default();
		let session = Session::open(Arc::new(backend.clone())).expect("Session should open.");
		let navigator = RecordingNavigator::default();
		let page = CallbackPage::load(
			&callback_url("success=true&external_user_id=user_abc"),
			&session,
			&test_config(),
		)
		.expect("Callback page should load.");

		assert_eq!(page.status, CallbackStatus::Success);
		assert_eq!(page.message, "Successfully connected Google Calendar for user user_abc");
		assert!(!page.offers_return());
		assert_eq!(backend.load(SESSION_KEY).expect("Load should succeed."), Some("user_abc".into()));

		let redirect = page.redirect.clone().expect("Success should schedule a redirect.");

		assert_eq!(
			redirect.target.as_str(),
			"http://localhost:5175/?success=true&external_user_id=user_abc"
		);
		assert_eq!(redirect.delay, Duration::seconds(2));

		redirect.fire(&navigator);

		assert_eq!(navigator.last(), Some(Navigation::Assign(redirect.target)));
		assert_eq!(
			page.into_result().expect("Success converts into the identifier.").as_str(),
			"user_abc"
		);
	}

	#[test]
	fn failure_offers_manual_return_without_persisting() {
		let backend = MemoryStore::default();
		let session = Session::open(Arc::new(backend.clone())).expect("Session should open.");
		let navigator = RecordingNavigator::default();
		let page = CallbackPage::load(&callback_url("error=access_denied"), &session, &test_config())
			.expect("Callback page should load.");

		assert_eq!(page.status, CallbackStatus::Error);
		assert_eq!(page.message, "OAuth failed: access_denied");
		assert_eq!(page.redirect, None);
		assert!(page.offers_return());
		assert!(backend.snapshot().is_empty());

		page.return_to_app(&navigator);

		assert_eq!(
			navigator.history(),
			vec![Navigation::Assign(Url::parse("http://localhost:5175/").expect("Root parses."))]
		);
		assert!(matches!(
			page.into_result(),
			Err(Error::CallbackFailure(CallbackError::Provider { .. }))
		));
	}

	#[test]
	fn malformed_callback_reports_generic_message() {
		let session =
			Session::open(Arc::new(MemoryStore::default())).expect("Session should open.");
		let page = CallbackPage::load(&callback_url("success=true"), &session, &test_config())
			.expect("Callback page should load.");

		assert_eq!(page.outcome, CallbackOutcome::Malformed);
		assert_eq!(page.message, "Invalid callback parameters");
		assert_eq!(page.status.heading(), "Connection Failed");
		assert_eq!(session.get(), None);
	}
}
