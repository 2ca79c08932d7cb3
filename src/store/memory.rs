//! Thread-safe in-memory [`SettingsStore`] implementation for tests and demos.

// self
use crate::{
	_prelude::*,
	store::{SettingsStore, StoreError},
};

/// Thread-safe storage backend that keeps maps in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryKvStore(Arc<RwLock<BTreeMap<String, JsonMap>>>);
impl MemoryKvStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds a key with a persisted map, bypassing the changed-value check.
	pub fn seed(&self, key: impl Into<String>, map: JsonMap) {
		self.0.write().insert(key.into(), map);
	}
}
impl SettingsStore for MemoryKvStore {
	fn get(&self, key: &str) -> Result<Option<JsonMap>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, map: &JsonMap) -> Result<bool, StoreError> {
		let mut guard = self.0.write();

		if guard.get(key).is_some_and(|existing| existing == map) {
			return Ok(false);
		}

		guard.insert(key.to_owned(), map.clone());

		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn sample() -> JsonMap {
		let mut map = JsonMap::new();

		map.insert("tw_enabled".into(), JsonValue::from(1));
		map.insert("tw_screen_name".into(), JsonValue::from("acme"));

		map
	}

	#[test]
	fn set_then_get_round_trip() {
		let store = MemoryKvStore::new();

		assert_eq!(store.get("social_bridge_option"), Ok(None));
		assert_eq!(store.set("social_bridge_option", &sample()), Ok(true));
		assert_eq!(store.get("social_bridge_option"), Ok(Some(sample())));
	}

	#[test]
	fn identical_writes_are_declined() {
		let store = MemoryKvStore::new();

		assert_eq!(store.set("social_bridge_option", &sample()), Ok(true));
		assert_eq!(
			store.set("social_bridge_option", &sample()),
			Ok(false),
			"Writing an unchanged map must be declined, not re-persisted.",
		);

		let mut changed = sample();

		changed.insert("tw_enabled".into(), JsonValue::from(0));

		assert_eq!(store.set("social_bridge_option", &changed), Ok(true));
	}

	#[test]
	fn keys_are_independent() {
		let store = MemoryKvStore::new();

		store.seed("a_option", sample());

		assert_eq!(store.get("b_option"), Ok(None));
	}
}
