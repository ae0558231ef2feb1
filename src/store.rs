//! Durable key/value storage contracts and built-in backends for the session identity.
//!
//! Stores model a browser's durable storage scope: string values addressed by string keys,
//! synchronous reads, and atomic writes per key. The session identity occupies a single
//! namespaced key so other data can share the same scope.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Storage backend contract implemented by session stores.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if any.
	fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Persists `value` under `key`, replacing any previous value wholesale.
	fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
