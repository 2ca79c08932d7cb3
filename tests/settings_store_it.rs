// std
use std::{env, fs, path::PathBuf, process, sync::Arc};
// self
use social_bridge::{
	host::RecordingHooks,
	identity::PluginIdentity,
	settings::Settings,
	store::{FileKvStore, SettingsStore},
};

fn temp_path() -> PathBuf {
	let unique = format!(
		"social_bridge_settings_it_{}_{}.json",
		process::id(),
		std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.expect("System clock should be past the epoch.")
			.as_nanos(),
	);

	env::temp_dir().join(unique)
}

fn make_identity() -> PluginIdentity {
	PluginIdentity::new("social_bridge", "social-bridge")
		.expect("Failed to build identity fixture for file store tests.")
}

#[test]
fn settings_survive_a_process_restart_through_the_file_store() {
	let path = temp_path();

	{
		let store = Arc::new(
			FileKvStore::open(&path).expect("Failed to open the file store snapshot."),
		);
		let settings =
			Settings::load(make_identity(), store, Arc::new(RecordingHooks::default()));

		settings
			.update([("fb_enabled", "1"), ("fb_app_id", "app-42"), ("fb_fan_gate", "7")])
			.expect("Update against the file store should persist.");
	}

	// A fresh store handle models the next process.
	let reopened = Arc::new(
		FileKvStore::open(&path).expect("Failed to reopen the file store snapshot."),
	);
	let persisted = reopened
		.get("social_bridge_option")
		.expect("Reading the persisted map should succeed.")
		.expect("The persisted map should survive the restart.");

	assert_eq!(persisted["fb_enabled"], serde_json::Value::from(1));
	assert_eq!(persisted["fb_app_id"], serde_json::Value::from("app-42"));
	assert_eq!(persisted["fb_fan_gate"], serde_json::Value::from(7));

	let settings =
		Settings::load(make_identity(), reopened, Arc::new(RecordingHooks::default()));

	assert!(settings.flag("fb_enabled"));
	assert_eq!(settings.text("fb_app_id"), "app-42");
	assert_eq!(settings.number("fb_fan_gate"), 7);
	assert!(!settings.flag("tw_enabled"), "Untouched options must still default.");

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary store snapshot {}: {e}", path.display())
	});
}

#[test]
fn hand_edited_partial_snapshots_default_fill_on_load() {
	let path = temp_path();

	fs::write(
		&path,
		br#"{"social_bridge_option": {"tw_enabled": 1, "tw_screen_name": "acme", "stale_key": "x"}}"#,
	)
	.expect("Failed to write the partial snapshot fixture.");

	let store =
		Arc::new(FileKvStore::open(&path).expect("Failed to open the partial snapshot."));
	let settings =
		Settings::load(make_identity(), store, Arc::new(RecordingHooks::default()));
	let snapshot = settings.snapshot();

	assert_eq!(snapshot.len(), 23, "Missing keys must be filled from defaults.");
	assert!(snapshot.flag("tw_enabled"));
	assert_eq!(snapshot.text("tw_screen_name"), "acme");
	assert!(snapshot.flag("show_button_on_login"));
	assert!(snapshot.get("stale_key").is_none(), "Unknown persisted keys must be dropped.");

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary store snapshot {}: {e}", path.display())
	});
}
