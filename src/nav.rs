//! Browser navigation seam.
//!
//! A full navigation replaces the page, so any in-memory state of the departing page is lost.
//! The connector carries everything it needs across that boundary in the URL itself.

// self
use crate::_prelude::*;

/// Host-provided browser navigation.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Performs a full navigation to `url` (`location.href = url`).
	fn assign(&self, url: &Url);

	/// Rewrites the current history entry without navigating (`history.replaceState`).
	fn replace(&self, url: &Url);
}

/// Navigation recorded by [`RecordingNavigator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
	/// Full navigation.
	Assign(Url),
	/// History entry rewrite.
	Replace(Url),
}

/// Navigator that records requests instead of performing them, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator(Mutex<Vec<Navigation>>);
impl RecordingNavigator {
	/// Every navigation recorded so far, oldest first.
	pub fn history(&self) -> Vec<Navigation> {
		self.0.lock().clone()
	}

	/// The most recent navigation, if any.
	pub fn last(&self) -> Option<Navigation> {
		self.0.lock().last().cloned()
	}
}
impl Navigator for RecordingNavigator {
	fn assign(&self, url: &Url) {
		self.0.lock().push(Navigation::Assign(url.clone()));
	}

	fn replace(&self, url: &Url) {
		self.0.lock().push(Navigation::Replace(url.clone()));
	}
}
