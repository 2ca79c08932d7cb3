// std
use std::sync::Arc;
// self
use social_bridge::{
	host::{HostPolicy, MemoryDirectory, RecordingHooks},
	identity::{PluginIdentity, UserId},
	provider::{Provider, ProviderRegistry, ProviderService},
	request::RequestSnapshot,
	service::ServiceContext,
	session::{FlashKind, MemorySessionStore, SessionStore},
	settings::Settings,
	store::MemoryKvStore,
	url::Url,
};

struct StubService(Provider);
impl ProviderService for StubService {
	fn provider(&self) -> Provider {
		self.0
	}
}

struct Fixture {
	context: ServiceContext,
	session: MemorySessionStore,
	directory: MemoryDirectory,
	hooks: RecordingHooks,
}

fn build_fixture() -> Fixture {
	let kv = MemoryKvStore::new();
	let hooks = RecordingHooks::default();
	let session = MemorySessionStore::new();
	let directory = MemoryDirectory::default();
	let identity = PluginIdentity::new("social_bridge", "social-bridge")
		.expect("Failed to build identity fixture for context tests.");
	let settings =
		Arc::new(Settings::load(identity, Arc::new(kv), Arc::new(hooks.clone())));
	let policy = HostPolicy::new(
		"Example Site",
		Url::parse("http://example.com/wp-login.php")
			.expect("Failed to parse login URL fixture."),
	);
	let context = ServiceContext::new(settings, Arc::new(session.clone()), policy)
		.with_directory(Arc::new(directory.clone()));

	Fixture { context, session, directory, hooks }
}

#[test]
fn flash_messages_flow_to_the_renderer_exactly_once() {
	let fixture = build_fixture();

	fixture.context.add_message("Logged in via Twitter.", false);
	fixture.context.add_message("Avatar sync failed.", true);

	// The rendering layer drains each bucket in bulk.
	assert_eq!(
		fixture.session.drain_flash("social_bridge", FlashKind::Updated),
		["Logged in via Twitter."],
	);
	assert_eq!(
		fixture.session.drain_flash("social_bridge", FlashKind::Error),
		["Avatar sync failed."],
	);

	// A second render pass sees nothing.
	assert!(fixture.session.drain_flash("social_bridge", FlashKind::Updated).is_empty());
	assert!(fixture.session.drain_flash("social_bridge", FlashKind::Error).is_empty());
}

#[test]
fn scratch_state_survives_exactly_one_redirect() {
	let fixture = build_fixture();

	// The login leg stashes state before redirecting to the provider.
	fixture.context.session_write("oauth_state", serde_json::json!({"state": "s-1", "redirect_to": "/profile"}));

	// The callback leg, a separate request on the same session, consumes it.
	let callback = fixture.context.clone().with_request(
		RequestSnapshot::new().with_query("state", "s-1").with_query("code", "code-1"),
	);
	let stashed = callback
		.session_take("oauth_state")
		.expect("The first take should find the stashed value.");

	assert_eq!(stashed["state"], serde_json::Value::from("s-1"));
	assert_eq!(callback.session_take("oauth_state"), None, "Scratch values are read-once.");

	// Replayed callbacks find nothing.
	let replay = fixture.context.clone();

	assert_eq!(replay.session_take("oauth_state"), None);
}

#[test]
fn provider_enablement_drives_the_context_view() {
	let fixture = build_fixture();

	assert!(!fixture.context.is_enabled(""));
	assert!(!fixture.context.is_enabled("twitter"));

	fixture
		.context
		.apply_settings_update([("tw_enabled", "1")])
		.expect("Enable update should persist.");

	assert!(fixture.context.is_enabled(""));
	assert!(fixture.context.is_enabled("twitter"));
	assert!(fixture.context.is_enabled("tw"));
	assert!(!fixture.context.is_enabled("facebook"));

	let registry =
		Arc::new(ProviderRegistry::new().with(Arc::new(StubService(Provider::Twitter))));
	let with_registry = fixture.context.clone().with_registry(registry);
	let service = with_registry
		.service_instance("twitter")
		.expect("The registered Twitter service should resolve.");

	assert!(service.enabled_in(&with_registry.settings));
	assert!(with_registry.service_instance("google").is_none());
}

#[test]
fn directory_lookup_links_external_identities() {
	let fixture = build_fixture();

	fixture.directory.assign("facebook_id", "fb-778", UserId::new(31));

	assert_eq!(fixture.context.meta_owner("facebook_id", "fb-778"), Some(UserId::new(31)));
	assert_eq!(fixture.context.meta_owner("facebook_id", "fb-999"), None);
	assert_eq!(fixture.context.meta_owner("twitter_id", "fb-778"), None);
}

#[test]
fn ssl_filter_overrides_raw_policy_flags() {
	let fixture = build_fixture();

	assert!(!fixture.context.is_ssl_required());

	fixture.hooks.force_filter(social_bridge::host::FORCE_SSL_FILTER, true);

	assert!(
		fixture.context.is_ssl_required(),
		"The filter must be able to force SSL on despite raw flags being off.",
	);
	assert_eq!(fixture.context.login_url().scheme(), "https");
}

#[test]
fn localized_labels_come_from_the_text_domain() {
	let fixture = build_fixture();

	assert_eq!(fixture.context.localize("Option updated."), "Option updated.");
	assert_eq!(
		fixture.context.settings.button_types(&social_bridge::host::PassthroughLocalizer),
		["Medium".to_owned(), "Large".to_owned()],
	);
}

#[test]
fn request_parameters_read_through_the_context() {
	let fixture = build_fixture();
	let request = RequestSnapshot::new()
		.with_query("code", "abc")
		.with_form("mode", "connect")
		.with_query("mode", "login");
	let context = fixture.context.with_request(request);

	assert_eq!(context.query("code"), Some("abc"));
	assert_eq!(context.form("mode"), Some("connect"));
	assert_eq!(context.param("mode"), Some("connect"));
	assert_eq!(context.param("missing"), None);
}
