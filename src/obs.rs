//! Optional observability helpers for connector flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `calendar_connect.flow` with the `flow` and
//!   `stage` fields, plus warning events for recoverable anomalies.
//! - Enable `metrics` to increment the `calendar_connect_flow_total` counter for every
//!   attempt/success/failure/superseded completion, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization redirect initiation.
	SignIn,
	/// Callback page classification and persistence.
	Callback,
	/// Root page landing parameter handling.
	Landing,
	/// Calendar collection loading.
	CalendarLoad,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::SignIn => "sign_in",
			FlowKind::Callback => "callback",
			FlowKind::Landing => "landing",
			FlowKind::CalendarLoad => "calendar_load",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a connector helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure surfaced to the caller.
	Failure,
	/// Completion discarded because a newer request replaced it.
	Superseded,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Superseded => "superseded",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
