//! Crate-level error types shared across flows, stores, and the remote API transport.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Every variant renders a human-readable message suitable for direct display; none of them is
/// fatal and each leaves the connector in a re-triable state.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identifier validation failure.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),

	/// The authorization service did not return an authorization URL; the user may retry.
	#[error("{source}")]
	AuthInitiationFailed {
		/// Failure reported by the remote API.
		#[source]
		source: crate::http::ApiError,
	},
	/// The provider reported an error or sent a malformed callback; sign-in must restart.
	#[error(transparent)]
	CallbackFailure(#[from] crate::flows::CallbackError),
	/// Fetching calendars failed; previously loaded calendars remain available.
	#[error("{source}")]
	CalendarLoadFailed {
		/// Failure reported by the remote API.
		#[source]
		source: crate::http::ApiError,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Application origin was not provided.
	#[error("Application origin is required.")]
	MissingOrigin,
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field that failed to parse.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured URL cannot act as a base for relative paths.
	#[error("The {field} URL cannot be used as a base: {url}.")]
	NotABase {
		/// Configuration field that failed validation.
		field: &'static str,
		/// Offending URL.
		url: String,
	},
	/// Callback path must be absolute.
	#[error("Callback path must start with `/`: {path}.")]
	InvalidCallbackPath {
		/// Offending path.
		path: String,
	},
	/// Redirect delay must not be negative.
	#[error("Redirect delay must not be negative.")]
	NegativeRedirectDelay,
}
