//! Connector flows and the composition root that wires them together.

pub mod callback;
pub mod common;
pub mod landing;
pub mod loader;
pub mod selection;
pub mod sign_in;

pub use callback::*;
pub use common::*;
pub use landing::*;
pub use loader::*;
pub use selection::*;
pub use sign_in::*;

// self
use crate::{
	_prelude::*,
	auth::ExternalUserId,
	calendar::{Calendar, CalendarId},
	config::ConnectorConfig,
	http::CalendarApi,
	nav::Navigator,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::Session,
	store::SessionStore,
	view::{ApiKeyWarning, AppView, CalendarPicker},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestCalendarApi;

#[cfg(feature = "reqwest")]
/// Connector specialized for the crate's default reqwest transport.
pub type ReqwestConnector = Connector<ReqwestCalendarApi>;

/// Coordinates sign-in, callback handling, and calendar loading for one browser profile.
///
/// The connector owns the remote API handle, the session, the navigation seam, and the three
/// controllers so hosts only forward page events (load, click, teardown) and render
/// [`Connector::view`]. Every controller is internally synchronized; a connector can be shared
/// behind an [`Arc`] between the task that renders and the tasks that await remote calls.
pub struct Connector<A>
where
	A: ?Sized + CalendarApi,
{
	api: Arc<A>,
	config: ConnectorConfig,
	session: Session,
	sign_in: SignInCoordinator,
	loader: CalendarLoader<A>,
	selection: Arc<SelectionController>,
	navigator: Arc<dyn Navigator>,
}
impl<A> Connector<A>
where
	A: ?Sized + CalendarApi,
{
	/// Creates a connector that reuses the caller-provided API implementation.
	///
	/// The session is read from `store` once, here.
	pub fn with_api(
		config: ConnectorConfig,
		store: Arc<dyn SessionStore>,
		api: impl Into<Arc<A>>,
		navigator: Arc<dyn Navigator>,
	) -> Result<Self> {
		let api = api.into();
		let session = Session::open(store)?;
		let selection = Arc::new(SelectionController::default());
		let loader = CalendarLoader::new(api.clone(), selection.clone());

		if config.api_key_missing() {
			obs::record_warning(FlowKind::SignIn, "Calendar API key is not configured.");
		}

		Ok(Self {
			api,
			config,
			session,
			sign_in: SignInCoordinator::default(),
			loader,
			selection,
			navigator,
		})
	}

	/// Validated configuration.
	pub fn config(&self) -> &ConnectorConfig {
		&self.config
	}

	/// Remote API handle.
	pub fn api(&self) -> &A {
		&self.api
	}

	/// Navigation seam, for firing a [`PendingRedirect`].
	pub fn navigator(&self) -> &dyn Navigator {
		&*self.navigator
	}

	/// Durable identity.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Current identity, if any.
	pub fn external_user_id(&self) -> Option<ExternalUserId> {
		self.session.get()
	}

	/// Sign-in coordinator.
	pub fn sign_in(&self) -> &SignInCoordinator {
		&self.sign_in
	}

	/// Calendar loader.
	pub fn loader(&self) -> &CalendarLoader<A> {
		&self.loader
	}

	/// Selection controller.
	pub fn selection(&self) -> &SelectionController {
		&self.selection
	}

	/// Shared load counters.
	pub fn load_metrics(&self) -> Arc<LoadMetrics> {
		self.loader.metrics()
	}

	/// Starts an authorization attempt ("Sign in with Google").
	pub async fn start_sign_in(&self) -> Result<SignInOutcome> {
		self.sign_in.start(&*self.api, &self.config, &*self.navigator).await
	}

	/// Processes the callback page opened at `url`.
	///
	/// On success the identity is persisted before this returns and the page carries the
	/// [`PendingRedirect`] the host must schedule.
	pub fn open_callback(&self, url: &Url) -> Result<CallbackPage> {
		CallbackPage::load(url, &self.session, &self.config)
	}

	/// Handles the root page opened at `url`.
	///
	/// A successful callback shape is persisted and adopted, and the current history entry is
	/// replaced by the bare path. A provider error becomes the visible sign-in error. The caller
	/// follows up with [`sync`](Self::sync) to load calendars for the adopted identity.
	pub fn handle_landing(&self, url: &Url) -> Result<LandingOutcome> {
		const KIND: FlowKind = FlowKind::Landing;

		let _guard = FlowSpan::new(KIND, "handle_landing").entered();
		let outcome = LandingOutcome::classify(url);

		match &outcome {
			LandingOutcome::SignedIn(id) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
				self.session.set(id).inspect_err(|e| {
					obs::record_flow_outcome(KIND, FlowOutcome::Failure);
					self.sign_in.fail(e.to_string());
				})?;
				self.sign_in.complete();
				self.loader.retarget(id);
				self.navigator.replace(&without_query(url));
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			LandingOutcome::SignInFailed(message) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
				obs::record_warning(KIND, message);
				self.sign_in.fail(message.clone());
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
			LandingOutcome::Untouched => {},
		}

		Ok(outcome)
	}

	/// Loads calendars for the identity currently held by the session, once per identity.
	pub async fn sync(&self) -> Result<LoadOutcome> {
		let identity = self.session.get();

		self.loader.sync_identity(identity.as_ref()).await
	}

	/// Reloads calendars for the current identity.
	pub async fn refresh(&self) -> Result<LoadOutcome> {
		self.loader.refresh().await
	}

	/// Selects a calendar by id; the id is not validated.
	pub fn select(&self, id: impl Into<CalendarId>) {
		self.selection.select(id);
	}

	/// Selected calendar resolved against the loaded collection.
	pub fn selected_calendar(&self) -> Option<Calendar> {
		self.selection.resolve(&self.loader.collection()).cloned()
	}

	/// Cancels any in-flight load; its completion will be discarded.
	pub fn teardown(&self) {
		self.loader.teardown();
	}

	/// Renders the root page state.
	pub fn view(&self) -> AppView {
		let snapshot = self.loader.snapshot();
		let is_loading = matches!(snapshot.load_state, LoadState::Loading);
		let selected_id = self.selection.selected();
		let selected = selected_id.as_ref().and_then(|id| snapshot.collection.find(id)).cloned();
		let picker = CalendarPicker::new(&snapshot.collection, selected_id.as_ref(), is_loading);

		AppView {
			external_user_id: self.session.get(),
			is_signing_in: self.sign_in.is_signing_in(),
			sign_in_error: self.sign_in.error(),
			load_error: snapshot.error,
			empty_state: AppView::empty_state_for(selected.is_some(), is_loading),
			picker,
			selected,
			api_key_warning: ApiKeyWarning::for_config(&self.config),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Connector<ReqwestCalendarApi> {
	/// Creates a connector that provisions its own reqwest-backed API client.
	pub fn new(
		config: ConnectorConfig,
		store: Arc<dyn SessionStore>,
		navigator: Arc<dyn Navigator>,
	) -> Result<Self> {
		let api = ReqwestCalendarApi::new(&config);

		Self::with_api(config, store, api, navigator)
	}
}
impl<A> Debug for Connector<A>
where
	A: ?Sized + CalendarApi,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Connector")
			.field("config", &self.config)
			.field("session", &self.session)
			.field("sign_in", &self.sign_in)
			.field("loader", &self.loader)
			.field("selection", &self.selection)
			.finish()
	}
}
