//! Crate-level error types shared by the settings hub and the service context.
//!
//! The taxonomy is deliberately small: almost every operation in this crate recovers locally and
//! returns a sentinel (`Option`, `bool`) instead of an error. What remains is storage trouble,
//! settings-update outcomes, identity validation, and the terminal hard-stop path.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Settings update did not commit.
	#[error(transparent)]
	Update(#[from] UpdateError),
	/// Identity validation problem.
	#[error(transparent)]
	Identity(#[from] crate::identity::IdentityError),
	/// Terminal request stop raised by a provider module.
	#[error(transparent)]
	Fatal(#[from] FatalRequest),
}

/// Failures surfaced by [`Settings::update`](crate::settings::Settings::update).
///
/// Whatever the variant, the live in-memory settings map is left untouched; only a successful
/// persistence commits the merged map.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum UpdateError {
	/// The storage backend reported a concrete failure while persisting the merged map.
	#[error("Settings could not be persisted.")]
	Persistence {
		/// Underlying storage failure.
		#[source]
		source: crate::store::StoreError,
	},
	/// The storage backend declined the write without raising an error.
	#[error("Settings store rejected the write.")]
	Rejected,
}

/// Terminal request stop with an HTTP status code, rendered title, and message.
///
/// This is the only fatal class in the crate: provider modules return it when a request cannot
/// continue (for example a missing required credential at login time) and the host boundary
/// renders it as the final page of the request.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{title}: {message}")]
pub struct FatalRequest {
	/// HTTP status code to respond with.
	pub status: u16,
	/// Rendered page title.
	pub title: String,
	/// Human-readable explanation shown to the end user.
	pub message: String,
	/// Whether the rendered page should offer a link back to the referring page.
	pub back_link: bool,
}
impl FatalRequest {
	/// Creates a new hard stop.
	pub fn new(status: u16, title: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, title: title.into(), message: message.into(), back_link: true }
	}

	/// Disables the back link on the rendered page.
	pub fn without_back_link(mut self) -> Self {
		self.back_link = false;

		self
	}
}

/// Human label for the status codes that show up in hard-stop titles.
pub fn status_label(status: u16) -> &'static str {
	match status {
		400 => "Bad Request",
		401 => "Unauthorized",
		403 => "Forbidden",
		404 => "Not Found",
		405 => "Method Not Allowed",
		410 => "Gone",
		429 => "Too Many Requests",
		500 => "Internal Server Error",
		502 => "Bad Gateway",
		503 => "Service Unavailable",
		_ => "Error",
	}
}
