//! Plugin and user identity types enforced across the integration core.

// std
use std::{borrow::Borrow, ops::Deref, str::FromStr};
// self
use crate::_prelude::*;

const PLUGIN_NAME_MAX_LEN: usize = 64;

/// Error returned when identity validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentityError {
	/// The value was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of value (plugin name, text domain).
		kind: &'static str,
	},
	/// The value contains a character outside `[a-z0-9_]`.
	#[error("{kind} contains the invalid character {found:?}.")]
	InvalidCharacter {
		/// Kind of value (plugin name, text domain).
		kind: &'static str,
		/// The offending character.
		found: char,
	},
	/// The value exceeded the allowed character count.
	#[error("{kind} exceeds {max} characters.")]
	TooLong {
		/// Kind of value (plugin name, text domain).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Validated plugin name.
///
/// The name seeds every derived key in the crate: the persisted option key, the session
/// namespace, nonce scopes, and hidden form-field names. It is therefore restricted to
/// `[a-z0-9_]` so the derived strings stay safe in storage keys and HTML attributes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginName(String);
impl PluginName {
	/// Creates a new plugin name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityError> {
		let view = value.as_ref();

		validate_name(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the name as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for PluginName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for PluginName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for PluginName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<PluginName> for String {
	fn from(value: PluginName) -> Self {
		value.0
	}
}
impl TryFrom<String> for PluginName {
	type Error = IdentityError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_name(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for PluginName {
	type Err = IdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for PluginName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "PluginName({})", self.0)
	}
}
impl Display for PluginName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Identity of the integration layer inside the host application.
///
/// Holds the validated [`PluginName`] plus the text domain handed to the localization
/// collaborator, and derives the fixed naming conventions every component shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginIdentity {
	/// Validated plugin name.
	pub name: PluginName,
	/// Text domain for localized strings.
	pub text_domain: String,
}
impl PluginIdentity {
	/// Creates a new identity after validating both parts.
	pub fn new(
		name: impl AsRef<str>,
		text_domain: impl Into<String>,
	) -> Result<Self, IdentityError> {
		let text_domain = text_domain.into();

		if text_domain.is_empty() {
			return Err(IdentityError::Empty { kind: "Text domain" });
		}

		Ok(Self { name: PluginName::new(name)?, text_domain })
	}

	/// Session namespace all flash and scratch values live under.
	pub fn namespace(&self) -> &str {
		self.name.as_str()
	}

	/// Fixed key the settings map is persisted under.
	pub fn option_key(&self) -> String {
		format!("{}_option", self.name)
	}

	/// Scoped nonce action name for the provided action.
	pub fn nonce_action(&self, action: &str) -> String {
		format!("{}_{action}", self.name)
	}

	/// Name of the hidden form field carrying the nonce token.
	pub fn nonce_field_name(&self) -> String {
		format!("_{}_nonce", self.name)
	}
}

/// Identifier of an account in the host user directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(u64);
impl UserId {
	/// Wraps a raw directory identifier.
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw directory identifier.
	pub const fn get(self) -> u64 {
		self.0
	}
}
impl From<u64> for UserId {
	fn from(raw: u64) -> Self {
		Self(raw)
	}
}
impl Display for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

fn validate_name(view: &str) -> Result<(), IdentityError> {
	const KIND: &str = "Plugin name";

	if view.is_empty() {
		return Err(IdentityError::Empty { kind: KIND });
	}
	if let Some(found) =
		view.chars().find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
	{
		return Err(IdentityError::InvalidCharacter { kind: KIND, found });
	}
	if view.len() > PLUGIN_NAME_MAX_LEN {
		return Err(IdentityError::TooLong { kind: KIND, max: PLUGIN_NAME_MAX_LEN });
	}

	Ok(())
}
