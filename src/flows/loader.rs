//! Calendar loading keyed to the current identity, with generation-guarded completions.
//!
//! Every load bumps a generation counter under the state lock and remembers the value it started
//! with. The completion path re-acquires the lock and applies its result only if the generation
//! still matches, so a completion for a superseded identity (or a torn-down view) is dropped
//! without touching the exposed state. The in-flight request itself is not aborted.

mod metrics;

pub use metrics::LoadMetrics;

// self
use crate::{
	_prelude::*,
	auth::ExternalUserId,
	calendar::{Calendar, CalendarCollection},
	flows::SelectionController,
	http::{ApiError, ByUserOptions, CalendarApi},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Loading phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
	/// No load has started for the current identity.
	#[default]
	Idle,
	/// A fetch is in flight.
	Loading,
	/// The last fetch succeeded; the collection holds its result.
	Loaded,
	/// The last fetch failed with this message; the previous collection stays visible.
	Failed(String),
}

/// What a load request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The result was applied to the exposed state.
	Applied,
	/// A newer load (or a teardown) replaced this one; its result was discarded.
	Superseded,
	/// The identity was already loaded or loading; no fetch was issued.
	Skipped,
	/// There is no identity to load for.
	Idle,
}

/// Exposed loader state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadSnapshot {
	/// Identity the state belongs to.
	pub identity: Option<ExternalUserId>,
	/// Last successfully loaded collection.
	pub collection: CalendarCollection,
	/// Loading phase.
	pub load_state: LoadState,
	/// Last load error, cleared when a new load starts.
	pub error: Option<String>,
}

#[derive(Debug, Default)]
struct LoaderInner {
	generation: u64,
	snapshot: LoadSnapshot,
}

/// Fetches the calendars of the current identity and defaults the selection.
pub struct CalendarLoader<A>
where
	A: ?Sized + CalendarApi,
{
	api: Arc<A>,
	selection: Arc<SelectionController>,
	inner: Mutex<LoaderInner>,
	metrics: Arc<LoadMetrics>,
}
impl<A> CalendarLoader<A>
where
	A: ?Sized + CalendarApi,
{
	/// Creates a loader that defaults `selection` on successful loads.
	pub fn new(api: impl Into<Arc<A>>, selection: Arc<SelectionController>) -> Self {
		Self {
			api: api.into(),
			selection,
			inner: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Copy of the exposed state.
	pub fn snapshot(&self) -> LoadSnapshot {
		self.inner.lock().snapshot.clone()
	}

	/// Last successfully loaded collection.
	pub fn collection(&self) -> CalendarCollection {
		self.inner.lock().snapshot.collection.clone()
	}

	/// Current loading phase.
	pub fn load_state(&self) -> LoadState {
		self.inner.lock().snapshot.load_state.clone()
	}

	/// Last load error.
	pub fn error(&self) -> Option<String> {
		self.inner.lock().snapshot.error.clone()
	}

	/// `true` while a fetch is in flight.
	pub fn is_loading(&self) -> bool {
		matches!(self.inner.lock().snapshot.load_state, LoadState::Loading)
	}

	/// Shared load counters.
	pub fn metrics(&self) -> Arc<LoadMetrics> {
		self.metrics.clone()
	}

	/// Reacts to the identity currently known to the session.
	///
	/// `None` cancels any in-flight load. An identity equal to the one already tracked is skipped,
	/// so each identity is fetched once; anything else starts a new load that supersedes the
	/// previous one.
	pub async fn sync_identity(&self, identity: Option<&ExternalUserId>) -> Result<LoadOutcome> {
		let Some(identity) = identity else {
			self.teardown();

			return Ok(LoadOutcome::Idle);
		};

		if self.inner.lock().snapshot.identity.as_ref() == Some(identity) {
			return Ok(LoadOutcome::Skipped);
		}

		self.load(identity.clone()).await
	}

	/// Reloads the tracked identity.
	pub async fn refresh(&self) -> Result<LoadOutcome> {
		let identity = self.inner.lock().snapshot.identity.clone();

		match identity {
			Some(identity) => self.load(identity).await,
			None => Ok(LoadOutcome::Idle),
		}
	}

	/// Fetches the calendars of `identity`, superseding any load in flight.
	///
	/// A failure that is still current is stored in the state and returned; a superseded
	/// completion, success or failure, yields [`LoadOutcome::Superseded`].
	pub async fn load(&self, identity: ExternalUserId) -> Result<LoadOutcome> {
		const KIND: FlowKind = FlowKind::CalendarLoad;

		let generation = self.begin(&identity);
		let span = FlowSpan::new(KIND, "load_calendars");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(self.api.calendars_by_user(identity.as_str(), ByUserOptions::synced()))
			.await;

		self.complete(generation, result)
	}

	/// Invalidates the in-flight load and forgets the tracked identity.
	///
	/// Used when the consuming view is torn down or the session loses its identity; the next
	/// [`sync_identity`](Self::sync_identity) fetches again.
	pub fn teardown(&self) {
		let mut inner = self.inner.lock();

		inner.generation += 1;
		inner.snapshot.identity = None;

		if matches!(inner.snapshot.load_state, LoadState::Loading) {
			inner.snapshot.load_state = LoadState::Idle;
		}
	}

	/// Drops everything tracked for another identity as soon as `identity` is adopted.
	///
	/// A load still in flight for a different identity is invalidated, so it cannot land between
	/// the session switch and the next [`sync_identity`](Self::sync_identity). The selection is
	/// left alone. Returns `false` when `identity` is already the tracked one.
	pub fn retarget(&self, identity: &ExternalUserId) -> bool {
		let mut inner = self.inner.lock();

		if inner.snapshot.identity.as_ref() == Some(identity) {
			return false;
		}

		inner.generation += 1;
		inner.snapshot = LoadSnapshot::default();

		true
	}

	fn begin(&self, identity: &ExternalUserId) -> u64 {
		let mut inner = self.inner.lock();

		inner.generation += 1;

		if inner.snapshot.identity.as_ref() != Some(identity) {
			inner.snapshot.collection = CalendarCollection::default();
			inner.snapshot.identity = Some(identity.clone());
		}

		inner.snapshot.load_state = LoadState::Loading;
		inner.snapshot.error = None;

		inner.generation
	}

	fn complete(
		&self,
		generation: u64,
		result: Result<Vec<Calendar>, ApiError>,
	) -> Result<LoadOutcome> {
		const KIND: FlowKind = FlowKind::CalendarLoad;

		let mut inner = self.inner.lock();

		if inner.generation != generation {
			obs::record_flow_outcome(KIND, FlowOutcome::Superseded);
			self.metrics.record_superseded();

			return Ok(LoadOutcome::Superseded);
		}

		match result {
			Ok(calendars) => {
				let collection = CalendarCollection::new(calendars);

				if let Some(first) = collection.first() {
					self.selection.default_to(&first.id);
				}

				inner.snapshot.collection = collection;
				inner.snapshot.load_state = LoadState::Loaded;
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.metrics.record_applied();

				Ok(LoadOutcome::Applied)
			},
			Err(source) => {
				let err = Error::CalendarLoadFailed { source };
				let message = err.to_string();

				inner.snapshot.load_state = LoadState::Failed(message.clone());
				inner.snapshot.error = Some(message);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.metrics.record_failure();

				Err(err)
			},
		}
	}
}
impl<A> Debug for CalendarLoader<A>
where
	A: ?Sized + CalendarApi,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CalendarLoader").field("state", &self.inner.lock().snapshot).finish()
	}
}
