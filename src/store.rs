//! Storage contract and built-in backends for persisted settings maps.
//!
//! The host's persistent key-value store implements [`SettingsStore`]; the settings hub issues
//! one `get` at construction and one `set` per update. The built-in memory and file backends
//! cover tests and lightweight embeddings.

pub mod file;
pub mod memory;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

// self
use crate::_prelude::*;

/// Persistent key-value contract the host storage layer implements.
pub trait SettingsStore
where
	Self: Send + Sync,
{
	/// Reads the persisted map stored under `key`, if any.
	fn get(&self, key: &str) -> Result<Option<JsonMap>, StoreError>;

	/// Writes `map` under `key`.
	///
	/// `Ok(false)` means the backend declined the write without failing, classically because
	/// the stored value is already identical. Callers treat it as "not persisted".
	fn set(&self, key: &str, map: &JsonMap) -> Result<bool, StoreError>;
}

/// Error type produced by [`SettingsStore`] implementations.
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
