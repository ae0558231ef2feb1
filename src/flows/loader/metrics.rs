// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for calendar loads.
#[derive(Debug, Default)]
pub struct LoadMetrics {
	attempts: AtomicU64,
	applied: AtomicU64,
	superseded: AtomicU64,
	failures: AtomicU64,
}
impl LoadMetrics {
	/// Returns the total number of fetches issued.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of successful completions applied to state.
	pub fn applied(&self) -> u64 {
		self.applied.load(Ordering::Relaxed)
	}

	/// Returns the number of completions discarded because a newer load replaced them.
	pub fn superseded(&self) -> u64 {
		self.superseded.load(Ordering::Relaxed)
	}

	/// Returns the number of failed completions applied to state.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_applied(&self) {
		self.applied.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_superseded(&self) {
		self.superseded.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
