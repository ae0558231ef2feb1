//! The durable, single-slot session identity.
//!
//! Lifecycle: the stored identity is read once when the session opens, written through on every
//! successful callback, and never expires. There is no clear operation; a new sign-in overwrites
//! the slot wholesale.

// self
use crate::{
	_prelude::*,
	auth::ExternalUserId,
	obs::{self, FlowKind},
	store::SessionStore,
};

/// Namespaced storage key holding the external user identifier.
pub const SESSION_KEY: &str = "buildcalendar_external_user_id";

/// Process-wide holder of the authenticated external user identifier.
pub struct Session {
	store: Arc<dyn SessionStore>,
	current: RwLock<Option<ExternalUserId>>,
}
impl Session {
	/// Opens the session by reading the persisted identity from `store`.
	///
	/// A stored value that fails identifier validation is ignored so a tampered slot degrades
	/// into an anonymous session instead of an error.
	pub fn open(store: Arc<dyn SessionStore>) -> Result<Self> {
		let current = match store.load(SESSION_KEY)? {
			Some(raw) => match ExternalUserId::new(&raw) {
				Ok(id) => Some(id),
				Err(e) => {
					obs::record_warning(
						FlowKind::Landing,
						&format!("Ignoring persisted session identity: {e}"),
					);

					None
				},
			},
			None => None,
		};

		Ok(Self { store, current: RwLock::new(current) })
	}

	/// Returns the identity read at initialization or written since.
	pub fn get(&self) -> Option<ExternalUserId> {
		self.current.read().clone()
	}

	/// Persists `id` so it survives reloads and restarts, then adopts it.
	pub fn set(&self, id: &ExternalUserId) -> Result<()> {
		let mut guard = self.current.write();

		self.store.save(SESSION_KEY, id.as_str())?;
		*guard = Some(id.clone());

		Ok(())
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session").field("external_user_id", &*self.current.read()).finish()
	}
}
