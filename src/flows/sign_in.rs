//! Authorization redirect initiation.
//!
//! State machine: `Idle -> SigningIn -> {NavigatingAway | Idle with error}`. Only `SigningIn`
//! blocks a new attempt. A successful attempt ends with a full navigation to the provider, after
//! which nothing on the departing page observes the result.

// self
use crate::{
	_prelude::*,
	auth::ExternalUserId,
	config::ConnectorConfig,
	http::{AuthUrlRequest, CalendarApi},
	nav::Navigator,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Phase of the sign-in coordinator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SignInState {
	/// No attempt in flight.
	#[default]
	Idle,
	/// Waiting for the authorization service to return a URL.
	SigningIn,
	/// Navigation to the provider has been requested; the page is about to be replaced.
	NavigatingAway {
		/// Provider authorization URL.
		authorize_url: Url,
	},
}

/// Ephemeral request generated for one sign-in attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthRequest {
	/// Identifier proposed to the authorization service.
	pub proposed_user_id: ExternalUserId,
	/// Callback page URL the provider redirects back to.
	pub callback_url: Url,
}

/// Result of [`SignInCoordinator::start`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInOutcome {
	/// The browser was sent to the provider.
	Redirecting {
		/// Request that produced the redirect.
		request: OAuthRequest,
		/// Provider authorization URL.
		authorize_url: Url,
	},
	/// Another attempt is still waiting for its authorization URL; nothing was done.
	AlreadySigningIn,
}

#[derive(Debug, Default)]
struct SignInInner {
	state: SignInState,
	error: Option<String>,
}

/// Starts authorization attempts and tracks the in-flight flag.
#[derive(Debug, Default)]
pub struct SignInCoordinator(Mutex<SignInInner>);
impl SignInCoordinator {
	/// Current phase.
	pub fn state(&self) -> SignInState {
		self.0.lock().state.clone()
	}

	/// `true` while waiting for the authorization URL; hosts disable re-entry on it.
	pub fn is_signing_in(&self) -> bool {
		matches!(self.0.lock().state, SignInState::SigningIn)
	}

	/// Last human-readable sign-in error, if any.
	pub fn error(&self) -> Option<String> {
		self.0.lock().error.clone()
	}

	/// Requests an authorization URL and navigates the browser to it.
	///
	/// Failures are recorded as the coordinator's error (and returned) after resetting to
	/// [`SignInState::Idle`]; nothing is retried automatically.
	pub async fn start<A>(
		&self,
		api: &A,
		config: &ConnectorConfig,
		navigator: &dyn Navigator,
	) -> Result<SignInOutcome>
	where
		A: ?Sized + CalendarApi,
	{
		const KIND: FlowKind = FlowKind::SignIn;

		{
			let mut inner = self.0.lock();

			if matches!(inner.state, SignInState::SigningIn) {
				return Ok(SignInOutcome::AlreadySigningIn);
			}

			inner.state = SignInState::SigningIn;
			inner.error = None;
		}

		let callback_url = match config.callback_url() {
			Ok(url) => url,
			Err(e) => {
				let err = Error::from(e);

				self.fail(err.to_string());

				return Err(err);
			},
		};

		let span = FlowSpan::new(KIND, "start_sign_in");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let request = OAuthRequest { proposed_user_id: ExternalUserId::propose(), callback_url };
		let response = span
			.instrument(api.get_auth_url(AuthUrlRequest {
				external_user_id: request.proposed_user_id.to_string(),
				callback_url: request.callback_url.to_string(),
			}))
			.await;

		match response {
			Ok(response) => {
				let authorize_url = response.url;

				self.0.lock().state =
					SignInState::NavigatingAway { authorize_url: authorize_url.clone() };
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				navigator.assign(&authorize_url);

				Ok(SignInOutcome::Redirecting { request, authorize_url })
			},
			Err(source) => {
				let err = Error::AuthInitiationFailed { source };

				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.fail(err.to_string());

				Err(err)
			},
		}
	}

	/// Clears the in-flight flag after the landing page adopted a new identity.
	pub(crate) fn complete(&self) {
		self.0.lock().state = SignInState::Idle;
	}

	/// Resets to idle with `message` as the visible error.
	pub(crate) fn fail(&self, message: String) {
		let mut inner = self.0.lock();

		inner.state = SignInState::Idle;
		inner.error = Some(message);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{ScriptedCalendarApi, test_config},
		error::ConfigError,
		http::{ApiError, AuthUrlResponse},
		nav::{Navigation, RecordingNavigator},
	};

	#[tokio::test]
	async fn successful_start_navigates_to_provider() {
		let api = ScriptedCalendarApi::default();
		let navigator = RecordingNavigator::default();
		let coordinator = SignInCoordinator::default();
		let provider = Url::parse("https://accounts.example.com/auth?x=1")
			.expect("Provider URL fixture should parse.");

		api.push_auth_url(Ok(AuthUrlResponse { url: provider.clone() }));

		let outcome = coordinator
			.start(&api, &test_config(), &navigator)
			.await
			.expect("Sign-in should start.");
		let SignInOutcome::Redirecting { request, authorize_url } = outcome else {
			panic!("Expected the coordinator to redirect.");
		};

		assert_eq!(authorize_url, provider);
		assert_eq!(request.callback_url.as_str(), "http://localhost:5175/google/callback");
		assert_eq!(navigator.history(), vec![Navigation::Assign(provider.clone())]);
		assert_eq!(coordinator.state(), SignInState::NavigatingAway { authorize_url: provider });
		assert!(!coordinator.is_signing_in());

		let sent = api.auth_requests();

		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].external_user_id, request.proposed_user_id.as_str());
		assert_eq!(sent[0].callback_url, "http://localhost:5175/google/callback");
	}

	#[tokio::test]
	async fn failed_start_resets_flag_and_records_error() {
		let api = ScriptedCalendarApi::default();
		let navigator = RecordingNavigator::default();
		let coordinator = SignInCoordinator::default();

		api.push_auth_url(Err(ApiError::Service {
			status: Some(500),
			message: "Provider unavailable".into(),
			cause: None,
		}));

		let err = coordinator
			.start(&api, &test_config(), &navigator)
			.await
			.expect_err("Sign-in should fail.");

		assert!(matches!(err, Error::AuthInitiationFailed { .. }));
		assert_eq!(coordinator.state(), SignInState::Idle);
		assert_eq!(coordinator.error().as_deref(), Some("Provider unavailable"));
		assert!(navigator.history().is_empty());
	}

	#[tokio::test]
	async fn start_is_blocked_while_signing_in() {
		let api = ScriptedCalendarApi::default();
		let navigator = RecordingNavigator::default();
		let coordinator = SignInCoordinator::default();

		coordinator.0.lock().state = SignInState::SigningIn;

		let outcome = coordinator
			.start(&api, &test_config(), &navigator)
			.await
			.expect("Re-entry should be a no-op.");

		assert_eq!(outcome, SignInOutcome::AlreadySigningIn);
		assert!(api.auth_requests().is_empty());
		assert!(coordinator.is_signing_in());
	}

	#[tokio::test]
	async fn unusable_callback_path_does_not_reset_attempt_in_flight() {
		let api = ScriptedCalendarApi::default();
		let navigator = RecordingNavigator::default();
		let coordinator = SignInCoordinator::default();
		let mut config = test_config();

		config.callback_path = "//[x".into();
		coordinator.0.lock().state = SignInState::SigningIn;

		let outcome = coordinator
			.start(&api, &config, &navigator)
			.await
			.expect("Re-entry should be a no-op.");

		assert_eq!(outcome, SignInOutcome::AlreadySigningIn);
		assert!(coordinator.is_signing_in());
		assert_eq!(coordinator.error(), None);

		coordinator.complete();

		let err = coordinator
			.start(&api, &config, &navigator)
			.await
			.expect_err("Unusable callback path should fail the attempt.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidUrl { field: "callback", .. })));
		assert_eq!(coordinator.state(), SignInState::Idle);
		assert_eq!(coordinator.error(), Some(err.to_string()));
		assert!(api.auth_requests().is_empty());
		assert!(navigator.history().is_empty());
	}

	#[test]
	fn complete_and_fail_return_to_idle() {
		let coordinator = SignInCoordinator::default();

		coordinator.0.lock().state = SignInState::SigningIn;
		coordinator.fail("Google sign-in failed: access_denied".into());

		assert_eq!(coordinator.state(), SignInState::Idle);
		assert_eq!(coordinator.error().as_deref(), Some("Google sign-in failed: access_denied"));

		coordinator.0.lock().state = SignInState::SigningIn;
		coordinator.complete();

		assert!(!coordinator.is_signing_in());
	}
}
