//! Active calendar selection.
//!
//! `select` is pure assignment. The stored id is never validated here; consumers resolve it
//! against the current collection and treat an unknown id as "no selection".

// self
use crate::{
	_prelude::*,
	calendar::{Calendar, CalendarCollection, CalendarId},
};

/// Tracks which calendar is active.
#[derive(Debug, Default)]
pub struct SelectionController(RwLock<Option<CalendarId>>);
impl SelectionController {
	/// Selects `id` unconditionally.
	pub fn select(&self, id: impl Into<CalendarId>) {
		*self.0.write() = Some(id.into());
	}

	/// The stored selection, valid or not.
	pub fn selected(&self) -> Option<CalendarId> {
		self.0.read().clone()
	}

	/// Resolves the stored selection against `collection`.
	pub fn resolve<'a>(&self, collection: &'a CalendarCollection) -> Option<&'a Calendar> {
		self.0.read().as_ref().and_then(|id| collection.find(id))
	}

	/// Selects `id` only when nothing is selected yet; returns whether it did.
	pub(crate) fn default_to(&self, id: &CalendarId) -> bool {
		let mut guard = self.0.write();

		if guard.is_some() {
			return false;
		}

		*guard = Some(id.clone());

		true
	}
}
