//! CSRF nonce issuance and verification.
//!
//! The crate only defines the scoping convention (`{plugin_name}_{action}`), the hidden-field
//! payload handed to the host renderer, and the [`NonceEngine`] boundary. A time-windowed
//! reference engine is included for hosts without their own token primitive.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Name of the hidden field echoing the referrer next to a nonce field.
pub const REFERER_FIELD: &str = "_http_referer";

const SECRET_LEN: usize = 32;

/// Token primitive supplied by the host transport.
///
/// Verification never raises; any malformed or stale token is simply `false`.
pub trait NonceEngine
where
	Self: Send + Sync,
{
	/// Issues a token bound to the provided scope.
	fn issue(&self, scope: &str) -> String;

	/// Verifies a previously issued token against the scope.
	fn verify(&self, token: &str, scope: &str) -> bool;
}

/// Hidden-field payload the host renderer embeds into a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonceField {
	/// Name of the hidden token input (`_{plugin_name}_nonce`).
	pub field_name: String,
	/// Issued token value.
	pub token: String,
	/// Referrer echo field, when requested and known.
	pub referrer: Option<ReferrerField>,
}

/// Hidden referrer echo rendered next to the nonce field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferrerField {
	/// Name of the hidden referrer input.
	pub field_name: String,
	/// Echoed request URI.
	pub value: String,
}

/// Time-windowed token engine modeled on classic CMS nonce semantics.
///
/// Tokens digest `secret | session token | scope | tick` with SHA-256, base64url (no padding),
/// truncated to [`TOKEN_LEN`](Self::TOKEN_LEN) characters. A token issued in one tick stays
/// valid through the following tick, so its effective lifetime ranges between half and the full
/// configured lifetime.
#[derive(Clone)]
pub struct TickNonceEngine {
	secret: String,
	session_token: String,
	lifetime: Duration,
}
impl TickNonceEngine {
	/// Truncated token length in characters.
	pub const TOKEN_LEN: usize = 10;

	const DEFAULT_LIFETIME: Duration = Duration::hours(24);

	/// Creates an engine from a host secret and the current session's token.
	pub fn new(secret: impl Into<String>, session_token: impl Into<String>) -> Self {
		Self {
			secret: secret.into(),
			session_token: session_token.into(),
			lifetime: Self::DEFAULT_LIFETIME,
		}
	}

	/// Creates an engine with a freshly generated random secret.
	///
	/// Tokens from such an engine only verify against the same instance (or its clones), which
	/// is exactly right for single-process embeddings and tests.
	pub fn random(session_token: impl Into<String>) -> Self {
		let secret: String =
			rand::rng().sample_iter(Alphanumeric).take(SECRET_LEN).map(char::from).collect();

		Self::new(secret, session_token)
	}

	/// Overrides the token lifetime; values under two seconds are clamped to two seconds.
	pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
		self.lifetime = lifetime.max(Duration::seconds(2));

		self
	}

	/// Issues a token for the scope as of the provided instant.
	pub fn issue_at(&self, scope: &str, at: OffsetDateTime) -> String {
		self.digest(scope, self.tick(at))
	}

	/// Verifies a token for the scope as of the provided instant.
	pub fn verify_at(&self, token: &str, scope: &str, at: OffsetDateTime) -> bool {
		let tick = self.tick(at);

		token == self.digest(scope, tick) || token == self.digest(scope, tick - 1)
	}

	fn tick(&self, at: OffsetDateTime) -> i64 {
		let half_life = (self.lifetime.whole_seconds() / 2).max(1);

		at.unix_timestamp().div_euclid(half_life)
	}

	fn digest(&self, scope: &str, tick: i64) -> String {
		let mut hasher = Sha256::new();

		hasher.update(self.secret.as_bytes());
		hasher.update(b"|");
		hasher.update(self.session_token.as_bytes());
		hasher.update(b"|");
		hasher.update(scope.as_bytes());
		hasher.update(b"|");
		hasher.update(tick.to_be_bytes());

		let mut encoded = URL_SAFE_NO_PAD.encode(hasher.finalize());

		encoded.truncate(Self::TOKEN_LEN);

		encoded
	}
}
impl NonceEngine for TickNonceEngine {
	fn issue(&self, scope: &str) -> String {
		self.issue_at(scope, OffsetDateTime::now_utc())
	}

	fn verify(&self, token: &str, scope: &str) -> bool {
		self.verify_at(token, scope, OffsetDateTime::now_utc())
	}
}
impl Debug for TickNonceEngine {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TickNonceEngine")
			.field("secret", &"<redacted>")
			.field("session_token", &"<redacted>")
			.field("lifetime", &self.lifetime)
			.finish()
	}
}
