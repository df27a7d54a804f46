use serde::Deserialize;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 180;

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OriginConfig {
	/// Base URL of the Nominatim geocoder.
	pub nominatim_url: Option<String>,

	/// URL of the Overpass API interpreter.
	pub overpass_url: Option<String>,

	/// Timeout of a single request, also passed to Overpass as query timeout.
	pub timeout_seconds: Option<u64>,

	/// Sent with every request. The public OSM services require a descriptive value.
	pub user_agent: Option<String>,
}

impl OriginConfig {
	pub fn nominatim_url(&self) -> &str {
		self.nominatim_url.as_deref().unwrap_or(DEFAULT_NOMINATIM_URL)
	}

	pub fn overpass_url(&self) -> &str {
		self.overpass_url.as_deref().unwrap_or(DEFAULT_OVERPASS_URL)
	}

	pub fn timeout_seconds(&self) -> u64 {
		self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
	}

	pub fn user_agent(&self) -> String {
		self
			.user_agent
			.clone()
			.unwrap_or_else(|| format!("roadcache/{}", env!("CARGO_PKG_VERSION")))
	}
}
