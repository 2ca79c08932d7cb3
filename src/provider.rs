//! Closed provider set and the registry that resolves provider-service instances.
//!
//! The original integration resolved service classes by reflecting over runtime type names.
//! Here the set is a closed enum: unknown names resolve to `None` instead of being discovered,
//! and services register explicitly at startup.

// self
use crate::{_prelude::*, settings::Settings};

/// Identity providers understood by the integration layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	/// Facebook login.
	Facebook,
	/// Twitter login.
	Twitter,
	/// Google login.
	Google,
	/// Yahoo login.
	Yahoo,
	/// mixi login.
	Mixi,
}
impl Provider {
	/// Every provider, in settings-table order.
	pub const ALL: [Provider; 5] =
		[Provider::Facebook, Provider::Twitter, Provider::Google, Provider::Yahoo, Provider::Mixi];

	/// Returns the canonical lowercase provider name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Provider::Facebook => "facebook",
			Provider::Twitter => "twitter",
			Provider::Google => "google",
			Provider::Yahoo => "yahoo",
			Provider::Mixi => "mixi",
		}
	}

	/// Short prefix used by the provider's settings keys.
	pub const fn key_prefix(self) -> &'static str {
		match self {
			Provider::Facebook => "fb",
			Provider::Twitter => "tw",
			Provider::Google => "ggl",
			Provider::Yahoo => "yahoo",
			Provider::Mixi => "mixi",
		}
	}

	/// Name of the enable flag in the settings map.
	pub const fn enabled_flag(self) -> &'static str {
		match self {
			Provider::Facebook => "fb_enabled",
			Provider::Twitter => "tw_enabled",
			Provider::Google => "ggl_enabled",
			Provider::Yahoo => "yahoo_enabled",
			Provider::Mixi => "mixi_enabled",
		}
	}

	/// Resolves a provider from a case-insensitive name or key prefix.
	pub fn parse(name: &str) -> Option<Self> {
		let lowered = name.trim().to_ascii_lowercase();

		Provider::ALL
			.into_iter()
			.find(|provider| provider.as_str() == lowered || provider.key_prefix() == lowered)
	}
}
impl Display for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Seam implemented by concrete provider login modules built on this core.
pub trait ProviderService
where
	Self: Send + Sync,
{
	/// Provider this service implements.
	fn provider(&self) -> Provider;

	/// Human-readable label for admin surfaces.
	fn label(&self) -> &str {
		self.provider().as_str()
	}

	/// Whether the provider is switched on in the settings hub.
	fn enabled_in(&self, settings: &Settings) -> bool {
		settings.is_enabled(self.provider().as_str())
	}
}

/// Explicit mapping from [`Provider`] to its registered service instance.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
	services: BTreeMap<Provider, Arc<dyn ProviderService>>,
}
impl ProviderRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a service, returning the instance it replaced, if any.
	pub fn register(
		&mut self,
		service: Arc<dyn ProviderService>,
	) -> Option<Arc<dyn ProviderService>> {
		self.services.insert(service.provider(), service)
	}

	/// Builder-style [`register`](Self::register).
	pub fn with(mut self, service: Arc<dyn ProviderService>) -> Self {
		self.register(service);

		self
	}

	/// Returns the registered service for the provider, if any.
	pub fn get(&self, provider: Provider) -> Option<Arc<dyn ProviderService>> {
		self.services.get(&provider).cloned()
	}

	/// Resolves a service from a case-insensitive name; unknown or unregistered names yield
	/// `None`.
	pub fn resolve(&self, name: &str) -> Option<Arc<dyn ProviderService>> {
		Provider::parse(name).and_then(|provider| self.get(provider))
	}

	/// Number of registered services.
	pub fn len(&self) -> usize {
		self.services.len()
	}

	/// Returns true when no service is registered.
	pub fn is_empty(&self) -> bool {
		self.services.is_empty()
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_set().entries(self.services.keys()).finish()
	}
}
