//! Host-side collaborator contracts: user directory, event/filter bus, localization, and the
//! environment policy facts the service context consults.
//!
//! The crate never implements host behavior; it consumes these traits. The in-memory
//! implementations here exist for tests and single-process embeddings.

// self
use crate::{_prelude::*, identity::UserId};

/// Filter consulted by [`Settings::show_button_on_login`](crate::settings::Settings::show_button_on_login).
pub const SHOW_BUTTON_FILTER: &str = "show_button_on_login";
/// Filter consulted by [`ServiceContext::is_ssl_required`](crate::service::ServiceContext::is_ssl_required).
pub const FORCE_SSL_FILTER: &str = "force_ssl_login";

/// Reverse index over the host's user directory.
pub trait UserDirectory
where
	Self: Send + Sync,
{
	/// Returns the single account owning the metadata pair, or `None` when nothing matches.
	///
	/// The underlying lookup returns at most one row by construction; implementations never
	/// raise for a miss.
	fn find_owner(&self, meta_key: &str, meta_value: &str) -> Option<UserId>;
}

/// In-memory [`UserDirectory`] for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
	inner: Arc<RwLock<BTreeMap<(String, String), UserId>>>,
}
impl MemoryDirectory {
	/// Assigns a metadata pair to an account, replacing any previous owner.
	pub fn assign(&self, meta_key: impl Into<String>, meta_value: impl Into<String>, user: UserId) {
		self.inner.write().insert((meta_key.into(), meta_value.into()), user);
	}
}
impl UserDirectory for MemoryDirectory {
	fn find_owner(&self, meta_key: &str, meta_value: &str) -> Option<UserId> {
		self.inner.read().get(&(meta_key.to_owned(), meta_value.to_owned())).copied()
	}
}

/// Event and filter dispatch supplied by the host.
pub trait HookBus
where
	Self: Send + Sync,
{
	/// Publishes an event with a JSON payload to interested listeners.
	fn publish(&self, event: &str, payload: JsonValue);

	/// Runs a boolean through the named filter chain; the returned value is authoritative even
	/// when it contradicts the raw input.
	fn filter_bool(&self, hook: &str, value: bool, context: &str) -> bool {
		let _ = (hook, context);

		value
	}
}

/// Hook bus that drops events and leaves filtered values unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHooks;
impl HookBus for NullHooks {
	fn publish(&self, _: &str, _: JsonValue) {}
}

/// Hook bus that records published events and lets tests force filter results.
#[derive(Clone, Debug, Default)]
pub struct RecordingHooks {
	events: Arc<RwLock<Vec<(String, JsonValue)>>>,
	forced: Arc<RwLock<BTreeMap<String, bool>>>,
}
impl RecordingHooks {
	/// Returns every event published so far, in order.
	pub fn events(&self) -> Vec<(String, JsonValue)> {
		self.events.read().clone()
	}

	/// Forces the named filter to return `value` regardless of its input.
	pub fn force_filter(&self, hook: impl Into<String>, value: bool) {
		self.forced.write().insert(hook.into(), value);
	}
}
impl HookBus for RecordingHooks {
	fn publish(&self, event: &str, payload: JsonValue) {
		self.events.write().push((event.to_owned(), payload));
	}

	fn filter_bool(&self, hook: &str, value: bool, _: &str) -> bool {
		self.forced.read().get(hook).copied().unwrap_or(value)
	}
}

/// Translates host-facing strings within a text domain.
pub trait Localizer
where
	Self: Send + Sync,
{
	/// Returns the translation of `text` within `domain`.
	fn translate(&self, text: &str, domain: &str) -> String;
}

/// Localizer that returns strings unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughLocalizer;
impl Localizer for PassthroughLocalizer {
	fn translate(&self, text: &str, _: &str) -> String {
		text.to_owned()
	}
}

/// Host environment facts consulted by the service context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostPolicy {
	/// Whether the host forces SSL for login actions.
	pub force_ssl_login: bool,
	/// Whether the host forces SSL for admin actions.
	pub force_ssl_admin: bool,
	/// Site name rendered into hard-stop titles.
	pub site_name: String,
	/// Login URL of the host application.
	pub login_url: Url,
}
impl HostPolicy {
	/// Creates a policy with both SSL flags off.
	pub fn new(site_name: impl Into<String>, login_url: Url) -> Self {
		Self {
			force_ssl_login: false,
			force_ssl_admin: false,
			site_name: site_name.into(),
			login_url,
		}
	}

	/// Forces SSL for login actions.
	pub fn with_forced_ssl_login(mut self) -> Self {
		self.force_ssl_login = true;

		self
	}

	/// Forces SSL for admin actions.
	pub fn with_forced_ssl_admin(mut self) -> Self {
		self.force_ssl_admin = true;

		self
	}
}
