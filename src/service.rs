//! Per-request service context composing the settings hub with every host collaborator.
//!
//! Concrete provider login modules hold one of these per request and get request-parameter
//! access, CSRF guarding, SSL policy, flash messaging, scratch storage, directory reverse
//! lookup, and provider-service resolution without talking to the host directly.

// self
use crate::{
	_prelude::*,
	error::{FatalRequest, UpdateError, status_label},
	host::{self, HookBus, HostPolicy, Localizer, MemoryDirectory, PassthroughLocalizer, UserDirectory},
	identity::{PluginIdentity, UserId},
	nonce::{self, NonceEngine, NonceField, ReferrerField, TickNonceEngine},
	obs::{CoreOp, OpOutcome, record_op_outcome},
	provider::{ProviderRegistry, ProviderService},
	request::{RequestSnapshot, RequestSource},
	session::{FlashKind, SessionStore},
	settings::{Settings, SettingsSnapshot},
};

/// Per-request facade shared by every concrete provider module.
///
/// The context owns cheap `Arc` handles to the process-wide collaborators plus the parameter
/// snapshot of the request being served. Construction wires the settings hub's identity and
/// hook bus through so the whole layer shares one dispatcher; the remaining collaborators have
/// working defaults replaceable through the `with_*` builders.
#[derive(Clone)]
pub struct ServiceContext {
	/// Plugin identity used for namespaces, nonce scopes, and the text domain.
	pub identity: PluginIdentity,
	/// Shared settings hub.
	pub settings: Arc<Settings>,
	/// Session storage supplied by the host transport.
	pub session: Arc<dyn SessionStore>,
	/// User directory reverse index.
	pub directory: Arc<dyn UserDirectory>,
	/// Event and filter dispatch bus.
	pub hooks: Arc<dyn HookBus>,
	/// Localization collaborator.
	pub localizer: Arc<dyn Localizer>,
	/// CSRF token primitive.
	pub nonces: Arc<dyn NonceEngine>,
	/// Closed provider-service registry.
	pub registry: Arc<ProviderRegistry>,
	/// Host environment policy facts.
	pub policy: HostPolicy,
	request: RequestSnapshot,
}
impl ServiceContext {
	/// Creates a context around the settings hub, session store, and host policy.
	///
	/// The directory defaults to an empty in-memory index, localization to a passthrough, the
	/// registry to empty, and the nonce engine to a process-local [`TickNonceEngine`] with a
	/// random secret; hosts should install their own engine via
	/// [`with_nonce_engine`](Self::with_nonce_engine) so tokens survive across workers.
	pub fn new(
		settings: Arc<Settings>,
		session: Arc<dyn SessionStore>,
		policy: HostPolicy,
	) -> Self {
		Self {
			identity: settings.identity().clone(),
			hooks: settings.hooks(),
			settings,
			session,
			directory: Arc::new(MemoryDirectory::default()),
			localizer: Arc::new(PassthroughLocalizer),
			nonces: Arc::new(TickNonceEngine::random("")),
			registry: Arc::new(ProviderRegistry::new()),
			policy,
			request: RequestSnapshot::new(),
		}
	}

	/// Replaces the user directory collaborator.
	pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
		self.directory = directory;

		self
	}

	/// Replaces the localization collaborator.
	pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
		self.localizer = localizer;

		self
	}

	/// Replaces the CSRF token primitive.
	pub fn with_nonce_engine(mut self, nonces: Arc<dyn NonceEngine>) -> Self {
		self.nonces = nonces;

		self
	}

	/// Replaces the provider-service registry.
	pub fn with_registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
		self.registry = registry;

		self
	}

	/// Replaces the hook bus (normally shared with the settings hub).
	pub fn with_hooks(mut self, hooks: Arc<dyn HookBus>) -> Self {
		self.hooks = hooks;

		self
	}

	/// Attaches the parameter snapshot of the request being served.
	pub fn with_request(mut self, request: RequestSnapshot) -> Self {
		self.request = request;

		self
	}

	/// Parameter snapshot of the request being served.
	pub fn request(&self) -> &RequestSnapshot {
		&self.request
	}

	/// Localizes a string within the plugin's text domain.
	pub fn localize(&self, text: &str) -> String {
		self.localizer.translate(text, &self.identity.text_domain)
	}

	/// Named query-string parameter, if present.
	pub fn query(&self, key: &str) -> Option<&str> {
		self.request.query(key)
	}

	/// Named form-body parameter, if present.
	pub fn form(&self, key: &str) -> Option<&str> {
		self.request.form(key)
	}

	/// Merged request parameter; form values win over query values.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.request.param(key)
	}

	/// Scoped nonce action name for the provided action.
	pub fn nonce_action(&self, action: &str) -> String {
		self.identity.nonce_action(action)
	}

	/// Issues the hidden-field payload protecting a form for the provided action.
	pub fn nonce_field(&self, action: &str, with_referrer: bool) -> NonceField {
		let token = self.nonces.issue(&self.nonce_action(action));
		let referrer = if with_referrer {
			self.request.uri().map(|uri| ReferrerField {
				field_name: nonce::REFERER_FIELD.to_owned(),
				value: uri.to_owned(),
			})
		} else {
			None
		};

		NonceField { field_name: self.identity.nonce_field_name(), token, referrer }
	}

	/// Verifies the submitted nonce for the provided action.
	///
	/// When `expected_referrer` is non-empty the submitted referrer parameter must equal it
	/// exactly on top of the token check. Returns `false` for any missing or stale input;
	/// never raises.
	pub fn verify_nonce(&self, action: &str, expected_referrer: &str) -> bool {
		let field_name = self.identity.nonce_field_name();
		let verified = self
			.param(&field_name)
			.is_some_and(|token| self.nonces.verify(token, &self.nonce_action(action)));
		let verified = if expected_referrer.is_empty() {
			verified
		} else {
			verified && self.param(nonce::REFERER_FIELD) == Some(expected_referrer)
		};

		record_op_outcome(
			CoreOp::NonceVerify,
			if verified { OpOutcome::Success } else { OpOutcome::Failure },
		);

		verified
	}

	/// Whether login actions must run over SSL.
	///
	/// Raw policy is the OR of the host's SSL-login and SSL-admin flags; the result of the
	/// `force_ssl_login` filter is authoritative even when it contradicts them.
	pub fn is_ssl_required(&self) -> bool {
		let raw = self.policy.force_ssl_login || self.policy.force_ssl_admin;

		self.hooks.filter_bool(host::FORCE_SSL_FILTER, raw, "")
	}

	/// Host login URL, upgraded to HTTPS when the SSL policy demands it.
	pub fn login_url(&self) -> Url {
		let mut url = self.policy.login_url.clone();

		if self.is_ssl_required() && url.scheme() == "http" {
			let _ = url.set_scheme("https");
		}

		url
	}

	/// Whether the named provider is switched on; an empty name asks "is any provider on?".
	pub fn is_enabled(&self, service: &str) -> bool {
		self.settings.is_enabled(service)
	}

	/// Appends a flash message to the current session.
	///
	/// No-op when no session is active; messages are never buffered outside a live session.
	pub fn add_message(&self, text: impl AsRef<str>, is_error: bool) {
		if !self.session.is_active() {
			return;
		}

		let kind = if is_error { FlashKind::Error } else { FlashKind::Updated };

		self.session.push_flash(self.identity.namespace(), kind, text.as_ref());
	}

	/// Reverse lookup of the directory entry owning a metadata pair.
	pub fn meta_owner(&self, meta_key: &str, meta_value: &str) -> Option<UserId> {
		self.directory.find_owner(meta_key, meta_value)
	}

	/// Resolves the registered service for a case-insensitive provider name.
	pub fn service_instance(&self, name: &str) -> Option<Arc<dyn ProviderService>> {
		self.registry.resolve(name)
	}

	/// Writes a scratch value under the plugin's session namespace.
	pub fn session_write(&self, key: &str, value: JsonValue) {
		self.session.put(self.identity.namespace(), key, value);
	}

	/// Removes and returns a scratch value; a second take for the same key finds nothing.
	pub fn session_take(&self, key: &str) -> Option<JsonValue> {
		self.session.take(self.identity.namespace(), key)
	}

	/// Deletes a scratch value without reading it.
	pub fn session_delete(&self, key: &str) {
		self.session.delete(self.identity.namespace(), key);
	}

	/// Builds the terminal error value that stops the current request.
	///
	/// The title renders as `{status label} | {site name}`, matching what the host's fatal
	/// page shows.
	pub fn halt(&self, message: impl Into<String>, status: u16) -> FatalRequest {
		FatalRequest::new(
			status,
			format!("{} | {}", status_label(status), self.policy.site_name),
			message,
		)
	}

	/// Runs a settings update and converts the outcome into a localized flash notice.
	///
	/// The settings hub itself stays message-free; this boundary adapter records
	/// "Option updated." on success and "Option failed to update." on failure, then hands the
	/// outcome back for the caller to act on.
	pub fn apply_settings_update<'a>(
		&self,
		submitted: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> Result<SettingsSnapshot, UpdateError> {
		match self.settings.update(submitted) {
			Ok(snapshot) => {
				self.add_message(self.localize("Option updated."), false);

				Ok(snapshot)
			},
			Err(error) => {
				self.add_message(self.localize("Option failed to update."), true);

				Err(error)
			},
		}
	}

	/// Applies a settings update using the current request's form body as the submitted bag.
	pub fn apply_settings_update_from_request(
		&self,
	) -> Result<SettingsSnapshot, UpdateError> {
		let submitted: Vec<(&str, &str)> = crate::settings::schema::DESCRIPTORS
			.iter()
			.filter_map(|descriptor| {
				self.form(descriptor.name()).map(|value| (descriptor.name(), value))
			})
			.collect();

		self.apply_settings_update(submitted)
	}
}
impl Debug for ServiceContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceContext")
			.field("identity", &self.identity)
			.field("settings", &self.settings)
			.field("registry", &self.registry)
			.field("policy", &self.policy)
			.field("request", &self.request)
			.finish()
	}
}
