use roadcache_core::ResolverOptions;
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
	/// Generate the graph from OpenStreetMap when the remote store has it but the download fails.
	#[serde(default)]
	pub origin_on_download_failure: bool,
}

impl ResolverConfig {
	pub fn options(&self) -> ResolverOptions {
		ResolverOptions {
			origin_on_download_failure: self.origin_on_download_failure,
		}
	}
}
