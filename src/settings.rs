//! Settings hub holding provider enable flags and credentials.
//!
//! One logical settings map exists per process. It is loaded once from the host's key-value
//! store (absent or malformed data just means "defaults"), mutated only through
//! [`Settings::update`], and written back on every successful update. There is no hidden
//! global: callers construct the hub explicitly and share it as an `Arc`.

pub mod schema;

pub use schema::{SettingDescriptor, SettingKind, SettingValue};

// self
use crate::{
	_prelude::*,
	error::UpdateError,
	host::{self, HookBus, Localizer},
	identity::PluginIdentity,
	obs::{CoreOp, CoreSpan, OpOutcome, record_op_outcome},
	provider::Provider,
	settings::schema::SettingsMap,
	store::SettingsStore,
};

// Persisted key the pre-registry Google integration stored its redirect URI under. Current
// code never honors it; its presence marks a stale configuration.
const LEGACY_GOOGLE_REDIRECT: &str = "ggl_redirect_uri";

/// Point-in-time copy of the full settings map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsSnapshot {
	values: SettingsMap,
}
impl SettingsSnapshot {
	/// Returns the typed value for a (possibly aliased) option name.
	pub fn get(&self, name: &str) -> Option<&SettingValue> {
		schema::resolve(name).and_then(|descriptor| self.values.get(descriptor.name()))
	}

	/// Flag value; `false` for unknown names and non-flag options.
	pub fn flag(&self, name: &str) -> bool {
		self.get(name).and_then(SettingValue::as_flag).unwrap_or(false)
	}

	/// Text value; empty for unknown names and non-text options.
	pub fn text(&self, name: &str) -> String {
		self.get(name).and_then(SettingValue::as_text).unwrap_or_default().to_owned()
	}

	/// Number value; zero for unknown names and non-number options.
	pub fn number(&self, name: &str) -> i64 {
		self.get(name).and_then(SettingValue::as_number).unwrap_or(0)
	}

	/// Serializes to the persisted JSON shape (flags as `0`/`1`).
	pub fn to_persisted(&self) -> JsonMap {
		schema::to_persisted(&self.values)
	}

	/// Iterates the map in canonical key order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SettingValue)> {
		self.values.iter().map(|(name, value)| (*name, value))
	}

	/// Number of recognized options (always the full schema).
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Always `false`; present for API completeness.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Process-wide settings hub.
pub struct Settings {
	identity: PluginIdentity,
	key: String,
	store: Arc<dyn SettingsStore>,
	hooks: Arc<dyn HookBus>,
	values: RwLock<SettingsMap>,
	update_guard: Mutex<()>,
}
impl Settings {
	/// Event published on the hook bus after every successful persistence.
	pub const UPDATED_EVENT: &'static str = "option_updated";

	/// Loads the hub from the host store.
	///
	/// Absent or malformed persisted data is not an error: missing keys take their declared
	/// defaults and unrecognized keys are dropped, so the live map always carries the full
	/// schema.
	pub fn load(
		identity: PluginIdentity,
		store: Arc<dyn SettingsStore>,
		hooks: Arc<dyn HookBus>,
	) -> Self {
		let _span = CoreSpan::new(CoreOp::SettingsLoad, "load").entered();
		let key = identity.option_key();
		let persisted = store.get(&key).ok().flatten();
		let values = RwLock::new(schema::from_persisted(persisted.as_ref()));

		Self { identity, key, store, hooks, values, update_guard: Mutex::new(()) }
	}

	/// Identity the hub derives its storage key and namespaces from.
	pub fn identity(&self) -> &PluginIdentity {
		&self.identity
	}

	/// Hook bus shared with the rest of the integration layer.
	pub fn hooks(&self) -> Arc<dyn HookBus> {
		self.hooks.clone()
	}

	/// Re-reads the persisted map, replacing the live view.
	///
	/// Hosts whose process model does not keep state across requests reconstruct the hub
	/// instead; this exists for long-lived workers that want to pick up writes from elsewhere.
	pub fn reload(&self) {
		let persisted = self.store.get(&self.key).ok().flatten();

		*self.values.write() = schema::from_persisted(persisted.as_ref());
	}

	/// Copies the live map.
	pub fn snapshot(&self) -> SettingsSnapshot {
		SettingsSnapshot { values: self.values.read().clone() }
	}

	/// Flag value; `false` for unknown names and non-flag options.
	pub fn flag(&self, name: &str) -> bool {
		self.with_value(name, |value| value.and_then(SettingValue::as_flag).unwrap_or(false))
	}

	/// Text value; empty for unknown names and non-text options.
	pub fn text(&self, name: &str) -> String {
		self.with_value(name, |value| {
			value.and_then(SettingValue::as_text).unwrap_or_default().to_owned()
		})
	}

	/// Number value; zero for unknown names and non-number options.
	pub fn number(&self, name: &str) -> i64 {
		self.with_value(name, |value| value.and_then(SettingValue::as_number).unwrap_or(0))
	}

	/// Merges validated submitted values into the live map and persists the result.
	///
	/// The candidate contains only recognized options present in the bag, coerced to their
	/// declared types; the merge overlays it onto the existing map, so keys absent from the
	/// submission keep their current values. The live map is replaced and
	/// [`UPDATED_EVENT`](Self::UPDATED_EVENT) published (payload: the full merged map in
	/// persisted shape) only after the store confirms the write. Updates serialize on an
	/// internal guard so two in-process calls cannot interleave their persist step.
	pub fn update<'a>(
		&self,
		submitted: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> Result<SettingsSnapshot, UpdateError> {
		let span = CoreSpan::new(CoreOp::SettingsUpdate, "update");
		let _guard = span.entered();
		let _update = self.update_guard.lock();

		record_op_outcome(CoreOp::SettingsUpdate, OpOutcome::Attempt);

		let candidate = schema::coerce_submitted(submitted);
		let mut merged = self.values.read().clone();

		merged.extend(candidate);

		let payload = schema::to_persisted(&merged);
		let outcome = match self.store.set(&self.key, &payload) {
			Ok(true) => {
				*self.values.write() = merged.clone();
				self.hooks.publish(Self::UPDATED_EVENT, JsonValue::Object(payload));

				Ok(SettingsSnapshot { values: merged })
			},
			Ok(false) => Err(UpdateError::Rejected),
			Err(source) => Err(UpdateError::Persistence { source }),
		};

		record_op_outcome(
			CoreOp::SettingsUpdate,
			if outcome.is_ok() { OpOutcome::Success } else { OpOutcome::Failure },
		);

		outcome
	}

	/// Whether the named provider is switched on.
	///
	/// The name is case-insensitive and alias-aware; an empty name asks "is any provider on?".
	/// Unknown names are simply off.
	pub fn is_enabled(&self, service: &str) -> bool {
		let service = service.trim();

		if service.is_empty() {
			return Provider::ALL.into_iter().any(|provider| self.flag(provider.enabled_flag()));
		}

		match Provider::parse(service) {
			Some(provider) => self.flag(provider.enabled_flag()),
			None => false,
		}
	}

	/// Whether login buttons should render in the given context.
	///
	/// The raw flag runs through the host's `show_button_on_login` filter, whose verdict is
	/// authoritative.
	pub fn show_button_on_login(&self, context: &str) -> bool {
		let raw = self.flag("show_button_on_login");

		self.hooks.filter_bool(host::SHOW_BUTTON_FILTER, raw, context)
	}

	/// Localized labels for the configurable button sizes, indexed by `button_type`.
	pub fn button_types(&self, localizer: &dyn Localizer) -> [String; 2] {
		let domain = &self.identity.text_domain;

		[localizer.translate("Medium", domain), localizer.translate("Large", domain)]
	}

	/// Reports whether a named piece of configuration is in a known-bad state.
	///
	/// `google_redirect`: the persisted map still carries a non-empty legacy
	/// `ggl_redirect_uri` entry that nothing honors anymore. Unrecognized names are fine.
	pub fn has_invalid_option(&self, name: &str) -> bool {
		match name {
			"google_redirect" => self
				.store
				.get(&self.key)
				.ok()
				.flatten()
				.and_then(|persisted| persisted.get(LEGACY_GOOGLE_REDIRECT).cloned())
				.as_ref()
				.and_then(JsonValue::as_str)
				.is_some_and(|uri| !uri.is_empty()),
			_ => false,
		}
	}

	fn with_value<T>(&self, name: &str, read: impl FnOnce(Option<&SettingValue>) -> T) -> T {
		let guard = self.values.read();
		let value =
			schema::resolve(name).and_then(|descriptor| guard.get(descriptor.name()));

		read(value)
	}
}
impl Debug for Settings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Settings")
			.field("identity", &self.identity)
			.field("key", &self.key)
			.field("values", &self.values.read().len())
			.finish()
	}
}
