//! Statically declared settings schema: recognized option names, semantic types, defaults,
//! aliases, and the coercion rules applied to persisted and submitted values.

// self
use crate::_prelude::*;

/// Semantic type declared for a recognized option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKind {
	/// On/off flag, persisted as `0`/`1`.
	Flag,
	/// Free-form credential or label string.
	Text,
	/// Small integer.
	Number,
}

/// Declared default for a recognized option; fully determines its [`SettingKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingDefault {
	/// Flag defaulting to off.
	FlagOff,
	/// Flag defaulting to on.
	FlagOn,
	/// Empty string.
	Empty,
	/// Zero.
	Zero,
}

/// Typed value held by the live settings map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingValue {
	/// On/off flag.
	Flag(bool),
	/// String value.
	Text(String),
	/// Integer value.
	Number(i64),
}
impl SettingValue {
	/// Returns the value's semantic kind.
	pub const fn kind(&self) -> SettingKind {
		match self {
			SettingValue::Flag(_) => SettingKind::Flag,
			SettingValue::Text(_) => SettingKind::Text,
			SettingValue::Number(_) => SettingKind::Number,
		}
	}

	/// Flag view of the value.
	pub fn as_flag(&self) -> Option<bool> {
		match self {
			SettingValue::Flag(flag) => Some(*flag),
			_ => None,
		}
	}

	/// Text view of the value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			SettingValue::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Number view of the value.
	pub fn as_number(&self) -> Option<i64> {
		match self {
			SettingValue::Number(number) => Some(*number),
			_ => None,
		}
	}

	/// Serializes to the persisted scalar shape: flags as `0`/`1`, strings, integers.
	pub fn to_json(&self) -> JsonValue {
		match self {
			SettingValue::Flag(flag) => JsonValue::from(i64::from(*flag)),
			SettingValue::Text(text) => JsonValue::from(text.as_str()),
			SettingValue::Number(number) => JsonValue::from(*number),
		}
	}

	/// Coerces a persisted scalar into a typed value; `None` means "treat as missing".
	pub fn from_json(kind: SettingKind, value: &JsonValue) -> Option<Self> {
		match kind {
			SettingKind::Flag => match value {
				JsonValue::Bool(flag) => Some(SettingValue::Flag(*flag)),
				JsonValue::Number(_) => value.as_i64().map(|n| SettingValue::Flag(n != 0)),
				JsonValue::String(s) => Some(SettingValue::Flag(s == "1")),
				_ => None,
			},
			SettingKind::Text => match value {
				JsonValue::String(s) => Some(SettingValue::Text(s.clone())),
				JsonValue::Number(n) => Some(SettingValue::Text(n.to_string())),
				_ => None,
			},
			SettingKind::Number => match value {
				JsonValue::Number(_) => value.as_i64().map(SettingValue::Number),
				JsonValue::String(s) => s.trim().parse().ok().map(SettingValue::Number),
				_ => None,
			},
		}
	}

	/// Coerces a submitted string to the declared kind; malformed input never fails.
	///
	/// Flags recognize only the enabled sentinel `"1"`; anything else is off. Non-numeric
	/// submissions for a number coerce to zero.
	pub fn coerce(kind: SettingKind, raw: &str) -> Self {
		match kind {
			SettingKind::Flag => SettingValue::Flag(raw == "1"),
			SettingKind::Text => SettingValue::Text(raw.to_owned()),
			SettingKind::Number => SettingValue::Number(raw.trim().parse().unwrap_or(0)),
		}
	}
}

/// Statically declared option recognized by the settings hub.
#[derive(Clone, Copy, Debug)]
pub struct SettingDescriptor {
	name: &'static str,
	default: SettingDefault,
}
impl SettingDescriptor {
	const fn new(name: &'static str, default: SettingDefault) -> Self {
		Self { name, default }
	}

	/// Canonical option name.
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Semantic type of the option.
	pub const fn kind(&self) -> SettingKind {
		match self.default {
			SettingDefault::FlagOff | SettingDefault::FlagOn => SettingKind::Flag,
			SettingDefault::Empty => SettingKind::Text,
			SettingDefault::Zero => SettingKind::Number,
		}
	}

	/// Declared default value.
	pub fn default_value(&self) -> SettingValue {
		match self.default {
			SettingDefault::FlagOff => SettingValue::Flag(false),
			SettingDefault::FlagOn => SettingValue::Flag(true),
			SettingDefault::Empty => SettingValue::Text(String::new()),
			SettingDefault::Zero => SettingValue::Number(0),
		}
	}
}

/// Every recognized option, grouped by provider with the shared display options last.
pub const DESCRIPTORS: &[SettingDescriptor] = &[
	SettingDescriptor::new("fb_enabled", SettingDefault::FlagOff),
	SettingDescriptor::new("fb_app_id", SettingDefault::Empty),
	SettingDescriptor::new("fb_app_secret", SettingDefault::Empty),
	SettingDescriptor::new("fb_fan_gate", SettingDefault::Zero),
	SettingDescriptor::new("tw_enabled", SettingDefault::FlagOff),
	SettingDescriptor::new("tw_screen_name", SettingDefault::Empty),
	SettingDescriptor::new("tw_consumer_key", SettingDefault::Empty),
	SettingDescriptor::new("tw_consumer_secret", SettingDefault::Empty),
	SettingDescriptor::new("tw_access_token", SettingDefault::Empty),
	SettingDescriptor::new("tw_access_token_secret", SettingDefault::Empty),
	SettingDescriptor::new("ggl_enabled", SettingDefault::FlagOff),
	SettingDescriptor::new("ggl_consumer_key", SettingDefault::Empty),
	SettingDescriptor::new("ggl_consumer_secret", SettingDefault::Empty),
	SettingDescriptor::new("yahoo_enabled", SettingDefault::FlagOff),
	SettingDescriptor::new("yahoo_application_id", SettingDefault::Empty),
	SettingDescriptor::new("yahoo_consumer_secret", SettingDefault::Empty),
	SettingDescriptor::new("mixi_enabled", SettingDefault::FlagOff),
	SettingDescriptor::new("mixi_consumer_key", SettingDefault::Empty),
	SettingDescriptor::new("mixi_consumer_secret", SettingDefault::Empty),
	SettingDescriptor::new("mixi_access_token", SettingDefault::Empty),
	SettingDescriptor::new("mixi_refresh_token", SettingDefault::Empty),
	SettingDescriptor::new("show_button_on_login", SettingDefault::FlagOn),
	SettingDescriptor::new("button_type", SettingDefault::Zero),
];

// Long-form names accepted wherever an option name is looked up. Resolved here, once, instead
// of at every read through a dynamic getter.
const NAME_ALIASES: &[(&str, &str)] = &[
	("facebook_enabled", "fb_enabled"),
	("twitter_enabled", "tw_enabled"),
	("google_enabled", "ggl_enabled"),
];

/// Live settings map keyed by canonical descriptor names.
pub type SettingsMap = BTreeMap<&'static str, SettingValue>;

/// Resolves a (possibly aliased) option name to its descriptor.
pub fn resolve(name: &str) -> Option<&'static SettingDescriptor> {
	let canonical = NAME_ALIASES
		.iter()
		.find_map(|(alias, target)| (*alias == name).then_some(*target))
		.unwrap_or(name);

	DESCRIPTORS.iter().find(|descriptor| descriptor.name == canonical)
}

/// Builds the full defaults map.
pub fn defaults() -> SettingsMap {
	DESCRIPTORS
		.iter()
		.map(|descriptor| (descriptor.name, descriptor.default_value()))
		.collect()
}

/// Overlays a persisted map onto the defaults.
///
/// Missing or uncoercible persisted values fall back to their defaults; keys outside the
/// recognized set are dropped. The result always contains every recognized option.
pub fn from_persisted(persisted: Option<&JsonMap>) -> SettingsMap {
	DESCRIPTORS
		.iter()
		.map(|descriptor| {
			let value = persisted
				.and_then(|map| map.get(descriptor.name))
				.and_then(|raw| SettingValue::from_json(descriptor.kind(), raw))
				.unwrap_or_else(|| descriptor.default_value());

			(descriptor.name, value)
		})
		.collect()
}

/// Coerces a submitted bag into a candidate map.
///
/// Only recognized options actually present in the bag appear in the candidate; everything else
/// is left for the merge step to preserve. Later duplicates win.
pub fn coerce_submitted<'a>(
	submitted: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> SettingsMap {
	submitted
		.into_iter()
		.filter_map(|(name, raw)| {
			resolve(name)
				.map(|descriptor| (descriptor.name(), SettingValue::coerce(descriptor.kind(), raw)))
		})
		.collect()
}

/// Serializes a live map to the persisted JSON shape.
pub fn to_persisted(map: &SettingsMap) -> JsonMap {
	map.iter().map(|(name, value)| ((*name).to_owned(), value.to_json())).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_recognized_option_has_a_default() {
		let map = defaults();

		assert_eq!(map.len(), 23);
		assert_eq!(map["fb_enabled"], SettingValue::Flag(false));
		assert_eq!(map["show_button_on_login"], SettingValue::Flag(true));
		assert_eq!(map["button_type"], SettingValue::Number(0));
		assert_eq!(map["tw_screen_name"], SettingValue::Text(String::new()));
	}

	#[test]
	fn persisted_values_fill_over_defaults() {
		let mut persisted = JsonMap::new();

		persisted.insert("tw_enabled".into(), JsonValue::from(1));
		persisted.insert("tw_screen_name".into(), JsonValue::from("acme"));

		let map = from_persisted(Some(&persisted));

		assert_eq!(map.len(), 23, "Missing keys must be filled from defaults.");
		assert_eq!(map["tw_enabled"], SettingValue::Flag(true));
		assert_eq!(map["tw_screen_name"], SettingValue::Text("acme".into()));
		assert_eq!(map["fb_enabled"], SettingValue::Flag(false));
	}

	#[test]
	fn unknown_persisted_keys_are_dropped() {
		let mut persisted = JsonMap::new();

		persisted.insert("ggl_redirect_uri".into(), JsonValue::from("https://example.com/cb"));
		persisted.insert("rogue".into(), JsonValue::from(9));

		let map = from_persisted(Some(&persisted));

		assert_eq!(map.len(), 23);
		assert!(!map.contains_key("ggl_redirect_uri"));
		assert!(!map.contains_key("rogue"));
	}

	#[test]
	fn malformed_persisted_values_fall_back_to_defaults() {
		let mut persisted = JsonMap::new();

		persisted.insert("fb_fan_gate".into(), JsonValue::from("not-a-number-at-all"));
		persisted.insert("fb_enabled".into(), JsonValue::Array(Vec::new()));

		let map = from_persisted(Some(&persisted));

		assert_eq!(map["fb_fan_gate"], SettingValue::Number(0));
		assert_eq!(map["fb_enabled"], SettingValue::Flag(false));
	}

	#[test]
	fn submitted_flags_recognize_only_the_enabled_sentinel() {
		assert_eq!(SettingValue::coerce(SettingKind::Flag, "1"), SettingValue::Flag(true));
		assert_eq!(SettingValue::coerce(SettingKind::Flag, "0"), SettingValue::Flag(false));
		assert_eq!(SettingValue::coerce(SettingKind::Flag, "yes"), SettingValue::Flag(false));
		assert_eq!(SettingValue::coerce(SettingKind::Flag, ""), SettingValue::Flag(false));
	}

	#[test]
	fn submitted_numbers_coerce_to_zero_when_malformed() {
		assert_eq!(SettingValue::coerce(SettingKind::Number, " 2 "), SettingValue::Number(2));
		assert_eq!(SettingValue::coerce(SettingKind::Number, "abc"), SettingValue::Number(0));
	}

	#[test]
	fn candidate_contains_only_present_recognized_keys() {
		let candidate =
			coerce_submitted([("tw_enabled", "1"), ("rogue", "x"), ("facebook_enabled", "1")]);

		assert_eq!(candidate.len(), 2);
		assert_eq!(candidate["tw_enabled"], SettingValue::Flag(true));
		assert_eq!(candidate["fb_enabled"], SettingValue::Flag(true), "Aliases must canonicalize.");
	}

	#[test]
	fn persisted_shape_uses_zero_one_flags() {
		let mut map = defaults();

		map.insert("yahoo_enabled", SettingValue::Flag(true));

		let persisted = to_persisted(&map);

		assert_eq!(persisted["yahoo_enabled"], JsonValue::from(1));
		assert_eq!(persisted["fb_enabled"], JsonValue::from(0));
		assert_eq!(persisted["show_button_on_login"], JsonValue::from(1));
		assert_eq!(persisted.len(), 23);
	}

	#[test]
	fn resolve_handles_aliases_and_unknown_names() {
		assert_eq!(
			resolve("google_enabled").map(SettingDescriptor::name),
			Some("ggl_enabled"),
		);
		assert_eq!(resolve("fb_enabled").map(SettingDescriptor::name), Some("fb_enabled"));
		assert!(resolve("telegram_enabled").is_none());
	}
}
