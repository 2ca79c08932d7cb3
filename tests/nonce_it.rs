// std
use std::sync::Arc;
// self
use social_bridge::{
	host::{HostPolicy, RecordingHooks},
	identity::PluginIdentity,
	nonce::{NonceEngine, TickNonceEngine},
	request::RequestSnapshot,
	service::ServiceContext,
	session::MemorySessionStore,
	settings::Settings,
	store::MemoryKvStore,
	url::Url,
};

fn build_context(engine: Arc<dyn NonceEngine>) -> ServiceContext {
	let identity = PluginIdentity::new("social_bridge", "social-bridge")
		.expect("Failed to build identity fixture for nonce tests.");
	let settings = Arc::new(Settings::load(
		identity,
		Arc::new(MemoryKvStore::new()),
		Arc::new(RecordingHooks::default()),
	));
	let policy = HostPolicy::new(
		"Example Site",
		Url::parse("https://example.com/wp-login.php")
			.expect("Failed to parse login URL fixture."),
	);

	ServiceContext::new(settings, Arc::new(MemorySessionStore::new()), policy)
		.with_nonce_engine(engine)
}

#[test]
fn form_round_trip_verifies_only_the_issuing_action() {
	let engine = Arc::new(TickNonceEngine::new("it-secret", "session-1"));
	let context = build_context(engine);
	let field = context.nonce_field("login", false);
	let posted = context.clone().with_request(
		RequestSnapshot::new().with_form(field.field_name.clone(), field.token.clone()),
	);

	assert!(posted.verify_nonce("login", ""));
	assert!(!posted.verify_nonce("logout", ""));
	assert!(!posted.verify_nonce("", ""), "The empty action is its own distinct scope.");
}

#[test]
fn tokens_do_not_cross_plugin_identities() {
	let engine = Arc::new(TickNonceEngine::new("it-secret", "session-1"));
	let context = build_context(engine.clone());
	let field = context.nonce_field("login", false);

	// Same engine, different plugin identity: the scope prefix differs.
	let other_identity = PluginIdentity::new("other_plugin", "other-plugin")
		.expect("Failed to build the second identity fixture.");
	let other_settings = Arc::new(Settings::load(
		other_identity,
		Arc::new(MemoryKvStore::new()),
		Arc::new(RecordingHooks::default()),
	));
	let other = ServiceContext::new(
		other_settings,
		Arc::new(MemorySessionStore::new()),
		HostPolicy::new(
			"Example Site",
			Url::parse("https://example.com/wp-login.php")
				.expect("Failed to parse login URL fixture."),
		),
	)
	.with_nonce_engine(engine)
	.with_request(RequestSnapshot::new().with_form("_other_plugin_nonce", field.token.clone()));

	assert!(!other.verify_nonce("login", ""));
}

#[test]
fn referrer_guard_requires_the_exact_submitted_value() {
	let engine = Arc::new(TickNonceEngine::new("it-secret", "session-1"));
	let context = build_context(engine);
	let admin = context
		.clone()
		.with_request(RequestSnapshot::new().with_uri("/wp-admin/options.php"));
	let field = admin.nonce_field("option_update", true);
	let referrer = field.referrer.clone().expect("Referrer echo should be present.");
	let posted = context.clone().with_request(
		RequestSnapshot::new()
			.with_form(field.field_name.clone(), field.token.clone())
			.with_form(referrer.field_name.clone(), referrer.value.clone()),
	);

	assert!(posted.verify_nonce("option_update", "/wp-admin/options.php"));
	assert!(!posted.verify_nonce("option_update", "/wp-admin/users.php"));

	// Without a referrer requirement the token alone suffices.
	assert!(posted.verify_nonce("option_update", ""));
}

#[test]
fn query_delivered_tokens_also_verify() {
	// Callback links carry the nonce in the query string rather than a form body.
	let engine = Arc::new(TickNonceEngine::new("it-secret", "session-1"));
	let context = build_context(engine);
	let field = context.nonce_field("disconnect", false);
	let linked = context.clone().with_request(
		RequestSnapshot::new().with_query(field.field_name.clone(), field.token.clone()),
	);

	assert!(linked.verify_nonce("disconnect", ""));
}
