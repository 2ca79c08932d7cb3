//! Configuration and per-request identity/session core for multi-provider social login:
//! validated settings merges, CSRF nonces, and one-shot flash messaging for host CMS
//! integrations.
//!
//! The host application supplies persistent key-value storage, a user directory, request
//! parameters, session storage, localization, and an event/filter bus; this crate consumes them
//! behind traits and composes them into a per-request [`service::ServiceContext`] shared by every
//! concrete provider login module built on top.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod host;
pub mod identity;
pub mod nonce;
pub mod obs;
pub mod provider;
pub mod request;
pub mod service;
pub mod session;
pub mod settings;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience fixtures and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		host::{HostPolicy, MemoryDirectory, RecordingHooks},
		identity::PluginIdentity,
		nonce::TickNonceEngine,
		service::ServiceContext,
		session::MemorySessionStore,
		settings::Settings,
		store::{MemoryKvStore, SettingsStore, StoreError},
	};

	/// Collaborator handles backing a [`build_test_context`] context, kept for assertions.
	pub struct TestHarness {
		/// Key-value store behind the settings hub.
		pub kv: MemoryKvStore,
		/// Hook bus that records published events.
		pub hooks: RecordingHooks,
		/// Session store shared with the context.
		pub session: MemorySessionStore,
		/// Directory reverse index shared with the context.
		pub directory: MemoryDirectory,
	}

	/// Store that declines every write; exercises the persistence-failure path.
	#[derive(Clone, Copy, Debug, Default)]
	pub struct FailingKvStore;
	impl SettingsStore for FailingKvStore {
		fn get(&self, _: &str) -> Result<Option<JsonMap>, StoreError> {
			Ok(None)
		}

		fn set(&self, key: &str, _: &JsonMap) -> Result<bool, StoreError> {
			Err(StoreError::Backend { message: format!("write to {key} refused by fixture") })
		}
	}

	/// Plugin identity fixture shared across unit tests.
	pub fn test_identity() -> PluginIdentity {
		PluginIdentity::new("social_bridge", "social-bridge")
			.expect("Test identity fixture should be valid.")
	}

	/// Host policy fixture with SSL flags off and a plain HTTP login URL.
	pub fn test_policy() -> HostPolicy {
		HostPolicy::new(
			"Example Site",
			Url::parse("http://example.com/wp-login.php")
				.expect("Login URL fixture should parse successfully."),
		)
	}

	/// Builds a service context wired to fresh in-memory collaborators.
	pub fn build_test_context() -> (ServiceContext, TestHarness) {
		let kv = MemoryKvStore::default();
		let hooks = RecordingHooks::default();
		let session = MemorySessionStore::new();
		let directory = MemoryDirectory::default();
		let settings = Arc::new(Settings::load(
			test_identity(),
			Arc::new(kv.clone()),
			Arc::new(hooks.clone()),
		));
		let context = ServiceContext::new(settings, Arc::new(session.clone()), test_policy())
			.with_directory(Arc::new(directory.clone()))
			.with_nonce_engine(Arc::new(TickNonceEngine::new("fixture-secret", "fixture-session")));

		(context, TestHarness { kv, hooks, session, directory })
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};

	/// Flat JSON object used for persisted settings maps and event payloads.
	pub type JsonMap = serde_json::Map<String, JsonValue>;
}

pub use serde_json;
pub use url;
