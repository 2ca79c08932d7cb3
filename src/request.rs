//! Typed read access to the request parameters supplied by the host transport.

// self
use crate::_prelude::*;

/// Read-only view of one inbound request's parameters.
///
/// Lookups never fail: an absent parameter is `None`, not an error. The merged
/// [`param`](Self::param) view prefers form-body values over query-string values, so a callback
/// parameter wins from whichever leg actually delivered it.
pub trait RequestSource
where
	Self: Send + Sync,
{
	/// Named query-string parameter, if present.
	fn query(&self, key: &str) -> Option<&str>;

	/// Named form-body parameter, if present.
	fn form(&self, key: &str) -> Option<&str>;

	/// Merged view; form values win over query values.
	fn param(&self, key: &str) -> Option<&str> {
		self.form(key).or_else(|| self.query(key))
	}

	/// Request URI echoed into referrer fields, when the transport provides one.
	fn uri(&self) -> Option<&str> {
		None
	}
}

/// Owned parameter snapshot captured from the host transport at request entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestSnapshot {
	query: BTreeMap<String, String>,
	form: BTreeMap<String, String>,
	uri: Option<String>,
}
impl RequestSnapshot {
	/// Creates an empty snapshot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a query-string parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Adds a form-body parameter.
	pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.insert(key.into(), value.into());

		self
	}

	/// Sets the request URI used for referrer echo fields.
	pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());

		self
	}

	/// Bulk-loads query parameters from key/value pairs.
	pub fn extend_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Bulk-loads form parameters from key/value pairs.
	pub fn extend_form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.form.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}
}
impl RequestSource for RequestSnapshot {
	fn query(&self, key: &str) -> Option<&str> {
		self.query.get(key).map(String::as_str)
	}

	fn form(&self, key: &str) -> Option<&str> {
		self.form.get(key).map(String::as_str)
	}

	fn uri(&self) -> Option<&str> {
		self.uri.as_deref()
	}
}
