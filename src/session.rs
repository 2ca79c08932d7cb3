//! Session-scoped flash messaging and one-shot scratch storage.
//!
//! Both live under the plugin's namespace inside whatever session mechanism the host transport
//! provides. Flash buckets are append-only and drained in bulk by the rendering layer; scratch
//! values carry short-lived state across a redirect boundary and can be read at most once.

// self
use crate::_prelude::*;

/// Flash bucket selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlashKind {
	/// Informational notices.
	Updated,
	/// Error notices.
	Error,
}
impl FlashKind {
	/// Returns the bucket's stable storage label.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlashKind::Updated => "updated",
			FlashKind::Error => "error",
		}
	}
}
impl Display for FlashKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Session storage supplied by the host transport.
///
/// Every operation must tolerate "no active session": writes are silently dropped and reads
/// return empty results. Nothing in this contract ever raises.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Whether a live session is attached to the current request.
	fn is_active(&self) -> bool;

	/// Appends a flash message to the named bucket under `namespace`.
	fn push_flash(&self, namespace: &str, kind: FlashKind, message: &str);

	/// Drains the named bucket, clearing it in the same step.
	fn drain_flash(&self, namespace: &str, kind: FlashKind) -> Vec<String>;

	/// Writes a scratch value under the namespace.
	fn put(&self, namespace: &str, key: &str, value: JsonValue);

	/// Removes and returns a scratch value; at most one take ever succeeds per written value.
	fn take(&self, namespace: &str, key: &str) -> Option<JsonValue>;

	/// Deletes a scratch value without reading it.
	fn delete(&self, namespace: &str, key: &str);
}

#[derive(Debug, Default)]
struct NamespaceState {
	updated: Vec<String>,
	error: Vec<String>,
	scratch: BTreeMap<String, JsonValue>,
}
impl NamespaceState {
	fn bucket_mut(&mut self, kind: FlashKind) -> &mut Vec<String> {
		match kind {
			FlashKind::Updated => &mut self.updated,
			FlashKind::Error => &mut self.error,
		}
	}
}

/// In-process [`SessionStore`] for tests, demos, and single-worker embeddings.
///
/// [`new`](Self::new) builds an attached store; [`detached`](Self::detached) builds one that
/// behaves like a request without a session, ignoring every write.
#[derive(Clone, Debug)]
pub struct MemorySessionStore {
	inner: Arc<RwLock<BTreeMap<String, NamespaceState>>>,
	active: bool,
}
impl MemorySessionStore {
	/// Creates an attached session store.
	pub fn new() -> Self {
		Self { inner: Arc::new(RwLock::new(BTreeMap::new())), active: true }
	}

	/// Creates a store that reports no active session.
	pub fn detached() -> Self {
		Self { inner: Arc::new(RwLock::new(BTreeMap::new())), active: false }
	}

	/// Peeks at a flash bucket without draining it.
	pub fn flash_snapshot(&self, namespace: &str, kind: FlashKind) -> Vec<String> {
		self.inner
			.read()
			.get(namespace)
			.map(|state| match kind {
				FlashKind::Updated => state.updated.clone(),
				FlashKind::Error => state.error.clone(),
			})
			.unwrap_or_default()
	}
}
impl Default for MemorySessionStore {
	fn default() -> Self {
		Self::new()
	}
}
impl SessionStore for MemorySessionStore {
	fn is_active(&self) -> bool {
		self.active
	}

	fn push_flash(&self, namespace: &str, kind: FlashKind, message: &str) {
		if !self.active {
			return;
		}

		self.inner
			.write()
			.entry(namespace.to_owned())
			.or_default()
			.bucket_mut(kind)
			.push(message.to_owned());
	}

	fn drain_flash(&self, namespace: &str, kind: FlashKind) -> Vec<String> {
		if !self.active {
			return Vec::new();
		}

		self.inner
			.write()
			.get_mut(namespace)
			.map(|state| std::mem::take(state.bucket_mut(kind)))
			.unwrap_or_default()
	}

	fn put(&self, namespace: &str, key: &str, value: JsonValue) {
		if !self.active {
			return;
		}

		self.inner
			.write()
			.entry(namespace.to_owned())
			.or_default()
			.scratch
			.insert(key.to_owned(), value);
	}

	fn take(&self, namespace: &str, key: &str) -> Option<JsonValue> {
		if !self.active {
			return None;
		}

		self.inner.write().get_mut(namespace).and_then(|state| state.scratch.remove(key))
	}

	fn delete(&self, namespace: &str, key: &str) {
		if !self.active {
			return;
		}

		if let Some(state) = self.inner.write().get_mut(namespace) {
			state.scratch.remove(key);
		}
	}
}
