use super::CacheKey;
use std::fmt::Display;

/// A request for one road network graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRequest {
	/// Place name understood by the origin, e.g. `"Piedmont, California, USA"`.
	pub location: String,
	/// Network type, e.g. `"drive"`.
	pub resource_type: String,
}

impl ResourceRequest {
	pub fn new(location: &str, resource_type: &str) -> Self {
		Self {
			location: location.to_string(),
			resource_type: resource_type.to_string(),
		}
	}

	pub fn cache_key(&self) -> CacheKey {
		CacheKey::derive(&self.location, &self.resource_type)
	}
}

impl Display for ResourceRequest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "'{}' ({})", self.location, self.resource_type)
	}
}
